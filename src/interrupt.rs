//! Interrupt handling
//!
//! The first SIGINT/SIGTERM sets a flag the runner checks between cases, so
//! teardown and the report still happen. A second one terminates the process
//! with exit code 1, which is the only way out while a HAL call is blocked.

use log::warn;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use std::os::raw::c_int;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::constants::EXIT_FAILURES;

/// Signals that request the run to stop
pub const TERM_SIGNALS: &[c_int] = &[SIGINT, SIGTERM];

/// Register the two-stage handler for `signals` and return the shared flag
pub fn install(signals: &[c_int]) -> Arc<AtomicBool> {
    let interrupted = Arc::new(AtomicBool::new(false));
    for &signal in signals {
        // Order matters: the shutdown check must see the flag before this delivery sets it
        let shutdown = flag::register_conditional_shutdown(signal, EXIT_FAILURES, Arc::clone(&interrupted));
        if let Err(e) = shutdown {
            warn!("Failed to register shutdown for signal {}: {}", signal, e);
        }
        if let Err(e) = flag::register(signal, Arc::clone(&interrupted)) {
            warn!("Failed to register interrupt flag for signal {}: {}", signal, e);
        }
    }
    interrupted
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_hook::consts::SIGUSR1;
    use signal_hook::low_level::raise;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_first_signal_sets_flag_without_exiting() {
        let interrupted = install(&[SIGUSR1]);
        assert!(!interrupted.load(Ordering::SeqCst));

        raise(SIGUSR1).unwrap();

        // Still running: the first delivery only records the request
        assert!(interrupted.load(Ordering::SeqCst));
    }

    #[test]
    fn test_term_signals_cover_interrupt_and_terminate() {
        assert_eq!(TERM_SIGNALS, &[SIGINT, SIGTERM]);
    }
}
