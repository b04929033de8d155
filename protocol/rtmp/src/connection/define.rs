/// What the peer is here for. Unknown until the command layer above sees a
/// publish or play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Publish,
    Pull,
}
