mod ids;
mod post;
mod reply;
mod subject;
mod user;
mod vote;
mod vote_record;
mod vote_totals;

pub use ids::{LoopId, PostId, ReplyId, SubjectId, UserId};
pub use post::{NewPost, Post};
pub use reply::{NewReply, Reply};
pub use subject::{SubjectKind, SubjectRef};
pub use user::UserProfile;
pub use vote::{VoteDelta, VoteValue, signum};
pub use vote_record::VoteRecord;
pub use vote_totals::VoteTotals;
