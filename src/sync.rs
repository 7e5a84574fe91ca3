// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

//! Mutual exclusion around the RTC register write sequence.

/// A region of code that runs exclusively against other writers.
///
/// `enter` blocks until exclusion is established and returns a token that
/// must be handed back to `exit`.
pub trait CriticalSection {
    type Token;

    fn enter(&self) -> Self::Token;
    fn exit(&self, token: Self::Token);
}

impl<C: CriticalSection + ?Sized> CriticalSection for &C {
    type Token = C::Token;

    fn enter(&self) -> Self::Token {
        (**self).enter()
    }

    fn exit(&self, token: Self::Token) {
        (**self).exit(token)
    }
}

/// Masks interrupts through the global `critical-section` implementation.
///
/// On the RP2040 that is `cortex-m`'s single core implementation. Sections
/// must be exited in the reverse order they were entered.
#[derive(Copy, Clone, Debug, Default)]
pub struct InterruptFree;

impl CriticalSection for InterruptFree {
    type Token = critical_section::RestoreState;

    fn enter(&self) -> Self::Token {
        unsafe { critical_section::acquire() }
    }

    fn exit(&self, token: Self::Token) {
        unsafe { critical_section::release(token) }
    }
}

/// Lock that leaves interrupts enabled. Needs compare-and-swap, which
/// Cortex-M0+ does not have; use `InterruptFree` there.
#[cfg(target_has_atomic = "8")]
pub struct SpinLock {
    mutex: spin::mutex::SpinMutex<()>,
}

#[cfg(target_has_atomic = "8")]
impl SpinLock {
    pub const fn new() -> SpinLock {
        SpinLock {
            mutex: spin::mutex::SpinMutex::new(()),
        }
    }
}

#[cfg(target_has_atomic = "8")]
impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_has_atomic = "8")]
impl CriticalSection for SpinLock {
    type Token = ();

    fn enter(&self) {
        // Held until exit
        core::mem::forget(self.mutex.lock());
    }

    fn exit(&self, _token: ()) {
        unsafe { self.mutex.force_unlock() }
    }
}
