pub mod initializer;
pub mod transport;

pub use initializer::MediaTransportInitializer;
pub use transport::{AudioTransport, InitCompletion, MediaEngine, RtpTransport, TransportError};
