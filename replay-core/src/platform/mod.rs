use std::fmt;

pub mod unsupported;

/// Platforms a replay backend can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
    Unsupported,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn detect() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Unsupported
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Unsupported => "unsupported platform",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    fn desktop_hosts_detect_as_unsupported() {
        assert_eq!(Platform::detect(), Platform::Unsupported);
    }
}
