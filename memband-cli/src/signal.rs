//! Interrupt Handling
//!
//! SIGINT and SIGTERM cancel the shared [`CancelToken`] so that an
//! unbounded run stops at the next iteration boundary and still reports.
//! The handler resets itself after the first delivery: a second Ctrl-C
//! terminates the process immediately.

use memband_core::CancelToken;
use std::sync::OnceLock;

static HANDLER_TOKEN: OnceLock<CancelToken> = OnceLock::new();

/// Route SIGINT/SIGTERM to `token`. Only the first call installs anything.
#[cfg(unix)]
pub fn install_interrupt_handler(token: &CancelToken) {
    if HANDLER_TOKEN.set(token.clone()).is_err() {
        return;
    }
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = interrupt_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART | libc::SA_RESETHAND;
        libc::sigemptyset(&mut sa.sa_mask);
        libc::sigaction(libc::SIGINT, &sa, std::ptr::null_mut());
        libc::sigaction(libc::SIGTERM, &sa, std::ptr::null_mut());
    }
}

/// Async-signal-safe: only an atomic store.
#[cfg(unix)]
extern "C" fn interrupt_handler(_sig: libc::c_int) {
    if let Some(token) = HANDLER_TOKEN.get() {
        token.cancel();
    }
}

/// No-op on non-Unix; runs stop only when the process is killed.
#[cfg(not(unix))]
pub fn install_interrupt_handler(token: &CancelToken) {
    let _ = HANDLER_TOKEN.set(token.clone());
}
