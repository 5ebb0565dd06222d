use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt};

/// A custom context type for user-facing error reporting via `eyre`.
///
/// Renders the deduplicated error chain on a single line for `Display`, and
/// as an indented context list for `Debug` (what `main` returning `Err`
/// prints).
#[derive(Debug, Default)]
pub struct Handler;

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        chain(error).format("; ").fmt(f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }
        let errors = chain(error).collect::<Vec<_>>();

        let (error, sources) = errors.split_first().unwrap();
        write!(f, "{error}")?;

        if !sources.is_empty() {
            write!(f, "\n\nContext:")?;

            let multiple = sources.len() > 1;
            for (n, error) in sources.iter().enumerate() {
                writeln!(f)?;
                if multiple {
                    write!(f, "- Error #{n}: {error}")?;
                } else {
                    write!(f, "- {error}")?;
                }
            }
        }

        Ok(())
    }
}

/// The rendered chain of sources of an error, with adjacent duplicate
/// messages removed.
fn chain(error: &(dyn Error + 'static)) -> impl Iterator<Item = String> + '_ {
    std::iter::successors(Some(error), |err| (*err).source()).map(ToString::to_string).dedup()
}

/// Installs the [`eyre`] and [`panic`](mod@std::panic) hooks as the global
/// ones.
pub fn install() {
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let panic_section =
        "This is a bug. Consider reporting it at https://github.com/gavel-rs/gavel";
    let (panic_hook, _) =
        color_eyre::config::HookBuilder::default().panic_section(panic_section).into_hooks();
    panic_hook.install();
    if let Err(err) = eyre::set_hook(Box::new(|_| Box::new(Handler))) {
        debug!("failed to install eyre error hook: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_deduplicates_adjacent_messages() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let outer = eyre::Report::new(inner).wrap_err("boom").wrap_err("loading artifact");
        let error: &(dyn Error + 'static) = outer.as_ref();
        let rendered = chain(error).collect::<Vec<_>>();
        assert_eq!(rendered, ["loading artifact", "boom"]);
    }
}
