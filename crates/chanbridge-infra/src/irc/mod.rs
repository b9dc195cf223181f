//! IRC protocol layer built on the `irc` crate.

pub mod driver;
pub mod translate;
pub mod transmitter;

pub use driver::IrcDriver;
pub use transmitter::IrcTransmitter;
