use std::fmt;
use std::str::FromStr;

/// Requested worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadCount {
    /// One worker per logical CPU.
    Auto,
    Fixed(usize),
    /// Run everything on the calling thread.
    #[default]
    Sequential,
}

impl ThreadCount {
    /// Effective number of workers, never zero.
    pub fn resolve(self) -> usize {
        match self {
            ThreadCount::Auto => num_cpus::get().max(1),
            ThreadCount::Fixed(count) => count.max(1),
            ThreadCount::Sequential => 1,
        }
    }
}

impl FromStr for ThreadCount {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("auto") {
            return Ok(ThreadCount::Auto);
        }
        match raw.parse::<usize>() {
            Ok(0) | Err(_) => Err(format!("expected \"auto\" or a positive integer, got \"{raw}\"")),
            Ok(1) => Ok(ThreadCount::Sequential),
            Ok(count) => Ok(ThreadCount::Fixed(count)),
        }
    }
}

impl fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadCount::Auto => f.write_str("auto"),
            ThreadCount::Fixed(count) => write!(f, "{count}"),
            ThreadCount::Sequential => f.write_str("1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_auto_and_counts() {
        assert_eq!("auto".parse::<ThreadCount>(), Ok(ThreadCount::Auto));
        assert_eq!("4".parse::<ThreadCount>(), Ok(ThreadCount::Fixed(4)));
        assert_eq!("1".parse::<ThreadCount>(), Ok(ThreadCount::Sequential));
        assert!("0".parse::<ThreadCount>().is_err());
        assert!("many".parse::<ThreadCount>().is_err());
    }

    #[test]
    fn auto_resolves_to_at_least_one() {
        assert!(ThreadCount::Auto.resolve() >= 1);
        assert_eq!(ThreadCount::Fixed(0).resolve(), 1);
    }
}
