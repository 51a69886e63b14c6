use std::vec::IntoIter;

use crate::desync_report::{DesyncNotice, DesyncReport};

pub struct DesyncEvents {
    reports: Vec<DesyncReport>,
    notices: Vec<DesyncNotice>,
}

impl Default for DesyncEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl DesyncEvents {
    pub(crate) fn new() -> Self {
        Self {
            reports: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty() && self.notices.is_empty()
    }

    pub fn read<V: DesyncEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: DesyncEvent>(&self) -> bool {
        V::has(self)
    }

    pub(crate) fn push_report(&mut self, report: DesyncReport) {
        self.notices.push(report.notice());
        self.reports.push(report);
    }
}

// Event Trait
pub trait DesyncEvent {
    type Iter;

    fn iter(events: &mut DesyncEvents) -> Self::Iter;

    fn has(events: &DesyncEvents) -> bool;
}

// Report Event
pub struct DesyncReportEvent;
impl DesyncEvent for DesyncReportEvent {
    type Iter = IntoIter<DesyncReport>;

    fn iter(events: &mut DesyncEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.reports);
        IntoIterator::into_iter(list)
    }

    fn has(events: &DesyncEvents) -> bool {
        !events.reports.is_empty()
    }
}

// Notice Event
pub struct DesyncNoticeEvent;
impl DesyncEvent for DesyncNoticeEvent {
    type Iter = IntoIter<DesyncNotice>;

    fn iter(events: &mut DesyncEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.notices);
        IntoIterator::into_iter(list)
    }

    fn has(events: &DesyncEvents) -> bool {
        !events.notices.is_empty()
    }
}
