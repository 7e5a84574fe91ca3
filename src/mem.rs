// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 The RP2040 RTC Authors

use crate::layout::map;

/// Trait to allow separation of register access from the RTC driver
pub trait RegisterAccess {
    fn read32(&self, offset: u64) -> u32;
    fn write32(&self, offset: u64, value: u32);
}

/// A memory-mapped I/O window.
pub struct MemoryRegion {
    base: u64,
    length: u64,
}

impl MemoryRegion {
    pub const fn new(base: u64, length: u64) -> MemoryRegion {
        MemoryRegion { base, length }
    }

    /// The RP2040 RTC block, including its atomic set/clear aliases.
    pub const fn rtc() -> MemoryRegion {
        MemoryRegion::new(map::rtc::START, map::rtc::SIZE)
    }

    fn io_read<T>(&self, offset: u64) -> T {
        assert!((offset + (core::mem::size_of::<T>() - 1) as u64) < self.length);
        unsafe { core::ptr::read_volatile((self.base + offset) as *const T) }
    }

    fn io_write<T>(&self, offset: u64, value: T) {
        assert!((offset + (core::mem::size_of::<T>() - 1) as u64) < self.length);
        unsafe {
            core::ptr::write_volatile((self.base + offset) as *mut T, value);
        }
    }

    pub fn io_read_u32(&self, offset: u64) -> u32 {
        self.io_read(offset)
    }

    pub fn io_write_u32(&self, offset: u64, value: u32) {
        self.io_write(offset, value)
    }
}

impl RegisterAccess for MemoryRegion {
    fn read32(&self, offset: u64) -> u32 {
        self.io_read_u32(offset)
    }

    fn write32(&self, offset: u64, value: u32) {
        self.io_write_u32(offset, value)
    }
}

#[cfg(test)]
pub mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use super::{MemoryRegion, RegisterAccess};
    use crate::layout::{offset, Ctrl};

    /// Something observable that happened during a driver call.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum Event {
        Read(u64),
        /// Caller, offset, value
        Write(usize, u64, u32),
        Enter(usize),
        Exit(usize),
        DelayUs(u32),
    }

    pub type Journal = Arc<Mutex<Vec<Event>>>;

    pub fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    thread_local! {
        static CALLER: Cell<usize> = const { Cell::new(0) };
    }

    /// Tag the events recorded from this thread with `id`.
    pub fn set_caller(id: usize) {
        CALLER.with(|c| c.set(id));
    }

    pub fn caller() -> usize {
        CALLER.with(|c| c.get())
    }

    /// Register block simulation: atomic aliases, the LOAD transfer and
    /// RTC_ENABLE driving RTC_ACTIVE.
    pub struct FakeRegisters {
        words: Mutex<BTreeMap<u64, u32>>,
        journal: Journal,
        // Widens the window for interleaving in concurrency tests.
        write_pause: Option<std::time::Duration>,
        stuck_active: bool,
    }

    impl FakeRegisters {
        pub fn new(journal: Journal) -> FakeRegisters {
            FakeRegisters {
                words: Mutex::new(BTreeMap::new()),
                journal,
                write_pause: None,
                stuck_active: false,
            }
        }

        /// An RTC that is running with the given divider.
        pub fn running(journal: Journal, clkdiv_m1: u32) -> FakeRegisters {
            let regs = FakeRegisters::new(journal);
            regs.poke(offset::CLKDIV_M1, clkdiv_m1);
            regs.poke(offset::CTRL, (Ctrl::RTC_ENABLE | Ctrl::RTC_ACTIVE).bits());
            regs
        }

        pub fn with_write_pause(mut self, pause: std::time::Duration) -> FakeRegisters {
            self.write_pause = Some(pause);
            self
        }

        /// RTC_ACTIVE stays set whatever RTC_ENABLE says.
        pub fn with_stuck_active(mut self) -> FakeRegisters {
            self.stuck_active = true;
            self
        }

        /// Set a register without recording anything.
        pub fn poke(&self, offset: u64, value: u32) {
            self.words.lock().unwrap().insert(offset, value);
        }

        pub fn peek(&self, offset: u64) -> u32 {
            *self.words.lock().unwrap().get(&offset).unwrap_or(&0)
        }

        pub fn writes(&self) -> Vec<(u64, u32)> {
            self.journal
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    Event::Write(_, o, v) => Some((*o, *v)),
                    _ => None,
                })
                .collect()
        }

        fn update_ctrl(&self, words: &mut BTreeMap<u64, u32>) {
            let mut ctrl = Ctrl::from_bits_retain(*words.get(&offset::CTRL).unwrap_or(&0));
            if ctrl.contains(Ctrl::LOAD) {
                let setup_0 = *words.get(&offset::SETUP_0).unwrap_or(&0);
                let setup_1 = *words.get(&offset::SETUP_1).unwrap_or(&0);
                words.insert(offset::RTC_1, setup_0);
                words.insert(offset::RTC_0, setup_1);
                ctrl.remove(Ctrl::LOAD);
            }
            ctrl.set(
                Ctrl::RTC_ACTIVE,
                self.stuck_active || ctrl.contains(Ctrl::RTC_ENABLE),
            );
            words.insert(offset::CTRL, ctrl.bits());
        }
    }

    impl RegisterAccess for FakeRegisters {
        fn read32(&self, offset: u64) -> u32 {
            self.journal.lock().unwrap().push(Event::Read(offset));
            self.peek(offset)
        }

        fn write32(&self, offset: u64, value: u32) {
            self.journal.lock().unwrap().push(Event::Write(caller(), offset, value));
            if let Some(pause) = self.write_pause {
                std::thread::sleep(pause);
            }

            let mut words = self.words.lock().unwrap();
            if offset >= offset::ATOMIC_CLEAR {
                let target = offset - offset::ATOMIC_CLEAR;
                let old = *words.get(&target).unwrap_or(&0);
                words.insert(target, old & !value);
            } else if offset >= offset::ATOMIC_SET {
                let target = offset - offset::ATOMIC_SET;
                let old = *words.get(&target).unwrap_or(&0);
                words.insert(target, old | value);
            } else {
                words.insert(offset, value);
            }
            self.update_ctrl(&mut words);
        }
    }

    #[test]
    fn test_memory_region_volatile_access() {
        let mut backing = [0u32; 4];
        let region = MemoryRegion::new(backing.as_mut_ptr() as u64, 16);

        region.write32(0x8, 0xdead_beef);
        assert_eq!(region.read32(0x8), 0xdead_beef);
        assert_eq!(region.io_read_u32(0x0), 0);
        assert_eq!(backing[2], 0xdead_beef);
    }

    #[test]
    #[should_panic]
    fn test_memory_region_bounds() {
        let mut backing = [0u32; 4];
        let region = MemoryRegion::new(backing.as_mut_ptr() as u64, 16);
        region.read32(0x10);
    }

    #[test]
    fn test_fake_atomic_aliases() {
        let regs = FakeRegisters::new(journal());
        regs.write32(offset::ATOMIC_SET + offset::CTRL, Ctrl::RTC_ENABLE.bits());
        assert_eq!(
            regs.peek(offset::CTRL),
            (Ctrl::RTC_ENABLE | Ctrl::RTC_ACTIVE).bits()
        );

        regs.write32(offset::SETUP_0, 0x1234);
        regs.write32(offset::SETUP_1, 0x5678);
        regs.write32(offset::ATOMIC_SET + offset::CTRL, Ctrl::LOAD.bits());
        assert_eq!(regs.peek(offset::RTC_1), 0x1234);
        assert_eq!(regs.peek(offset::RTC_0), 0x5678);
        assert!(!Ctrl::from_bits_retain(regs.peek(offset::CTRL)).contains(Ctrl::LOAD));

        regs.write32(offset::ATOMIC_CLEAR + offset::CTRL, Ctrl::RTC_ENABLE.bits());
        assert_eq!(regs.peek(offset::CTRL), 0);
        assert_eq!(regs.writes().len(), 5);
    }
}
