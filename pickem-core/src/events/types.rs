/// Request to re-import headlines for every league under one sport.
///
/// Carries only the sport id; the importer loads the league list and the
/// feed URLs from the store when the event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlineRefresh {
    pub sport_id: i32,
}
