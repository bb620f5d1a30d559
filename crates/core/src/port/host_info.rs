// Host Info Port (for testability)
// The only OS query command resolution is allowed to make

/// Host operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Unix,
}

/// Host information interface (allows mocking the OS family so both
/// shell branches are testable on any host)
pub trait HostInfo: Send + Sync {
    fn os_family(&self) -> OsFamily;
}

/// Real host information (production)
pub struct SystemHostInfo;

impl HostInfo for SystemHostInfo {
    fn os_family(&self) -> OsFamily {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }
}

pub mod mocks {
    use super::*;

    /// Mock HostInfo reporting a fixed OS family
    pub struct MockHostInfo(pub OsFamily);

    impl HostInfo for MockHostInfo {
        fn os_family(&self) -> OsFamily {
            self.0
        }
    }
}
