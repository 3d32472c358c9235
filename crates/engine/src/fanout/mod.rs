mod registry;

pub use registry::{
    register_authenticated, ChannelSink, ConnectionSink, FanoutEvent, FanoutRegistry,
};
