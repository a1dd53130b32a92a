mod hub;

pub use hub::{LiveFeedEvent, LiveFeedHub, Subscription};
