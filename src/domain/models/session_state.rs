use super::Message;

/// Snapshot of a chat session. Only the session controller writes it; render
/// layers receive clones.
///
/// `streaming_buffer` is the uncommitted tail of `history` and is only ever
/// `Some` while `busy` is true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub history: Vec<Message>,
    pub streaming_buffer: Option<String>,
    pub busy: bool,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        return !self.busy;
    }
}
