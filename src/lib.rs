//! Stateless fair draws from a fixed pool.
//!
//! All draw state lives in a token carried by a share link: a bit mask of
//! the items not yet drawn plus an optional creation time. [`StateCodec`]
//! turns that state into a token and back, and [`DrawEngine`] clears one
//! uniformly chosen bit per draw. Nothing is stored anywhere else.
//!
//! ```
//! use std::sync::Arc;
//! use linkdraw::{DrawEngine, DrawOutcome, DrawState, Pool, StateCodec};
//!
//! let pool = Arc::new(Pool::reference());
//! let codec = StateCodec::new(pool.clone());
//! let engine = DrawEngine::new(pool.clone());
//!
//! let token = codec.encode(&DrawState::fresh(&pool, None));
//! assert_eq!(token, "me7");
//!
//! let state = codec.decode(&token).unwrap_or_default();
//! if let DrawOutcome::Picked(pick) = engine.draw_random(&state) {
//!     assert_eq!(pick.next.remaining_count(), 8);
//! }
//! ```

pub mod codec;
pub mod config;
pub mod engine;
pub mod link;
pub mod pool;
pub mod state;

pub use codec::{StateCodec, Token};
pub use config::{ConfigError, DrawConfig};
pub use engine::{DrawEngine, DrawOutcome, IndexSource, Pick, RngSource};
pub use link::{LinkBuilder, LinkError, LinkMode};
pub use pool::{Pool, PoolError, PoolItem};
pub use state::{DrawState, now_ms};
