pub mod bookmarks;
pub mod redis;
pub mod store;

pub use bookmarks::BookmarkStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use store::{KeyValueStore, MemoryStore};
