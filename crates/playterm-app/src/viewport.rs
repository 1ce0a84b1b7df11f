//! Host terminal geometry

use playterm_types::Geometry;

/// Current size of the terminal attached to stdout, if there is one
#[cfg(unix)]
pub fn terminal_size() -> Option<Geometry> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    let rc = unsafe {
        libc::ioctl(
            libc::STDOUT_FILENO,
            libc::TIOCGWINSZ,
            &mut winsize as *mut libc::winsize,
        )
    };

    if rc != 0 || winsize.ws_col == 0 || winsize.ws_row == 0 {
        return None;
    }
    Some(Geometry::new(winsize.ws_col, winsize.ws_row))
}

#[cfg(not(unix))]
pub fn terminal_size() -> Option<Geometry> {
    None
}

/// Probe that falls back to `fallback` when stdout is not a terminal
pub fn probe(fallback: Geometry) -> impl Fn() -> Geometry + Send + 'static {
    move || terminal_size().unwrap_or(fallback)
}
