//! Domain entities - the core business objects.

mod comment;
mod content;
mod document;
mod interaction;
mod post;
mod subreddit;
mod update;
mod user;
mod votes;

pub use comment::Comment;
pub use content::{MAX_CONTENT_LEN, validate_content, validate_length};
pub use document::{Document, ParentKind};
pub use interaction::{CommentView, Interaction, PostView, Project, Records, project};
pub use post::Post;
pub use subreddit::Subreddit;
pub use update::PostUpdate;
pub use user::User;
pub use votes::{AlreadyVoted, TransitionKind, VoteDirection, VoteTransition, Votes};
