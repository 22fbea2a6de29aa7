//! Command-line surface: a single optional positional thread count.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;

/// Exit status for a malformed command line or a non-positive thread
/// count.
pub const EXIT_BAD_ARGS: u8 = 32;

/// Run the heat diffusion over an in-process worker world.
#[derive(Debug, Parser)]
#[command(name = "calor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Compute threads per worker. Overrides the configured value.
    #[arg(allow_negative_numbers = true)]
    threads: Option<i64>,
}

/// Reasons the command line is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    /// clap could not parse the arguments (or was asked for help or the
    /// version, see [`ArgsError::is_informational`]).
    #[error("wrong parameters: {0}")]
    Parse(#[source] clap::Error),
    /// The thread count parsed but is zero or negative.
    #[error("wrong number of threads: {threads}")]
    NonPositiveThreads {
        /// The value given.
        threads: i64,
    },
}

impl ArgsError {
    /// Whether this is a `--help` or `--version` request rather than a
    /// real error.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::Parse(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
        )
    }
}

/// Parse `args` (program name first) into the thread-count override.
///
/// `Ok(None)` means no positional argument was given.
pub fn parse_threads<I, T>(args: I) -> Result<Option<usize>, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(ArgsError::Parse)?;
    match cli.threads {
        None => Ok(None),
        Some(threads) if threads <= 0 => Err(ArgsError::NonPositiveThreads { threads }),
        Some(threads) => usize::try_from(threads)
            .map(Some)
            .map_err(|_| ArgsError::NonPositiveThreads { threads }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_argument_leaves_threads_unset() {
        assert_eq!(parse_threads(["calor"]).unwrap(), None);
    }

    #[test]
    fn positive_count_is_accepted() {
        assert_eq!(parse_threads(["calor", "6"]).unwrap(), Some(6));
    }

    #[test]
    fn zero_and_negative_counts_are_rejected() {
        for bad in ["0", "-3"] {
            let err = parse_threads(["calor", bad]).unwrap_err();
            assert!(matches!(err, ArgsError::NonPositiveThreads { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn extra_or_malformed_arguments_are_parse_errors() {
        let err = parse_threads(["calor", "2", "3"]).unwrap_err();
        assert!(matches!(err, ArgsError::Parse(_)));
        assert!(!err.is_informational());

        let err = parse_threads(["calor", "many"]).unwrap_err();
        assert!(matches!(err, ArgsError::Parse(_)));
    }

    #[test]
    fn help_is_informational() {
        let err = parse_threads(["calor", "--help"]).unwrap_err();
        assert!(err.is_informational());
    }
}
