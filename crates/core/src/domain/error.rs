// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Empty segment rejected")]
    EmptySegment,

    #[error("Segment contains reserved delimiter ';': {0}")]
    DelimiterInSegment(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
