//! Terminal output for `meltano-docs-ctl`.
//!
//! Reports go to stdout and diagnostics to stderr, both through `anstream` so
//! ANSI styling is dropped when the stream is not a terminal or `NO_COLOR` is
//! set. Expanded documents and tables are printed unstyled with [`plain`].

mod styles;

use std::fmt::Display;
use std::io::Write;

use anstyle::Style;

pub(crate) use styles::clap_styles;

use styles::{DIM, ERROR, HEADER, LABEL, SUCCESS, WARNING};

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn emit(stream: Stream, style: Style, line: impl Display) {
    // write errors (closed pipe) are ignored
    match stream {
        Stream::Stdout => writeln!(anstream::stdout().lock(), "{style}{line}{style:#}").ok(),
        Stream::Stderr => writeln!(anstream::stderr().lock(), "{style}{line}{style:#}").ok(),
    };
}

pub(crate) fn success(msg: impl Display) {
    emit(Stream::Stdout, SUCCESS, format_args!("✓ {msg}"));
}

/// Fatal errors, on stderr.
pub(crate) fn error(msg: impl Display) {
    emit(Stream::Stderr, ERROR, format_args!("✗ {msg}"));
}

/// Directive diagnostics and empty results, on stderr.
pub(crate) fn warning(msg: impl Display) {
    emit(Stream::Stderr, WARNING, format_args!("! {msg}"));
}

pub(crate) fn header(msg: impl Display) {
    emit(Stream::Stdout, HEADER, msg);
}

/// `  Name: value` with the name in bold.
pub(crate) fn label(name: impl Display, value: impl Display) {
    writeln!(anstream::stdout().lock(), "  {LABEL}{name}:{LABEL:#} {value}").ok();
}

pub(crate) fn dim(msg: impl Display) {
    emit(Stream::Stdout, DIM, msg);
}

pub(crate) fn item(msg: impl Display) {
    emit(Stream::Stdout, Style::new(), format_args!("  • {msg}"));
}

pub(crate) fn blank() {
    emit(Stream::Stdout, Style::new(), "");
}

pub(crate) fn plain(msg: impl Display) {
    emit(Stream::Stdout, Style::new(), msg);
}
