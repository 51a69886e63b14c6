use concord_shared::ExecutionOpinion;

/// Locates the first trace hash at which `local` and `remote` disagree.
///
/// Hashes are scanned pairwise up to the shorter log. When the shared prefix
/// matches but the logs differ in length, the last index of the shorter log
/// is returned. `None` means no specific point can be identified: the shorter
/// log is empty, or the logs are identical.
pub fn find_trace_hashes_diff(
    local: &ExecutionOpinion,
    remote: &ExecutionOpinion,
) -> Option<usize> {
    let local_hashes = local.trace_hashes();
    let remote_hashes = remote.trace_hashes();
    let count = local_hashes.len().min(remote_hashes.len());

    if let Some(index) = local_hashes
        .iter()
        .zip(remote_hashes.iter())
        .position(|(a, b)| a != b)
    {
        return Some(index);
    }

    if local_hashes.len() != remote_hashes.len() {
        return count.checked_sub(1);
    }

    None
}
