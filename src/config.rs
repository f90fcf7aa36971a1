//! Fixed game dimensions and runtime server settings.

/// Side length of every grid.
pub const GRID_SIZE: u8 = 5;
/// Number of cells in a grid.
pub const GRID_CELLS: usize = GRID_SIZE as usize * GRID_SIZE as usize;
/// Number of concealed boats each player holds.
pub const BOAT_COUNT: usize = 5;

/// Wire protocol version exchanged in the session handshake.
pub const PROTOCOL_VERSION: u8 = 1;

#[cfg(feature = "std")]
pub use server::ServerConfig;

#[cfg(feature = "std")]
mod server {
    use std::string::String;
    use std::time::Duration;

    /// Runtime settings for the network boundary.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Address the TCP listener binds to.
        pub bind: String,
        /// Upper bound on a single frame read or write.
        pub io_timeout: Duration,
        /// Largest accepted frame body in bytes.
        pub max_frame_size: u32,
        /// Buffered events per subscriber before slow readers start lagging.
        pub event_capacity: usize,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: String::from("127.0.0.1:7878"),
                io_timeout: Duration::from_secs(30),
                max_frame_size: 1 << 20,
                event_capacity: 64,
            }
        }
    }
}
