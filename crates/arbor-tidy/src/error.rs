use crate::tree::NodeIndex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("node index {index} is not part of the tree")]
    UnknownNode { index: NodeIndex },
}

pub type Result<T> = std::result::Result<T, Error>;
