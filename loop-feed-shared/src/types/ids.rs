//! Identifier aliases for the loop feed document model.
//!
//! The backing document store keys every record by an opaque string id, so
//! these are aliases rather than wrapper types. A `SubjectId` is either a
//! `PostId` or a `ReplyId` depending on the subject kind it travels with.

/// Identifier of a loop (a community/channel that contains posts).
pub type LoopId = String;

/// Identifier of a post within a loop.
pub type PostId = String;

/// Identifier of a reply within a post's thread.
pub type ReplyId = String;

/// Identifier of a votable subject: a post id or a reply id.
pub type SubjectId = String;

/// Stable identifier of a user, supplied by the identity provider.
pub type UserId = String;
