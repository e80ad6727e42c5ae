// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Sparse, auto-growing memory for the virtual machine, split into fixed-size pages so
//! that a program poking a far-away address doesn't drag a dense allocation behind it.
//! Reads beyond the populated extent are 0; negative addresses are rejected.

use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::FxHashMap;

const PAGE_LEN: usize = 256;
const PAGE_MASK: i64 = PAGE_LEN as i64 - 1;

static EMPTY_PAGE: [i64; PAGE_LEN] = [0; PAGE_LEN];

/// An access below address zero. The computer wraps this into [`VmError::NegativeAddress`]
/// with the offending instruction address attached.
///
/// [`VmError::NegativeAddress`]: crate::VmError::NegativeAddress
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct NegativeAddress(pub(crate) i64);

#[derive(Clone)]
pub(crate) struct Memory {
    pages: FxHashMap<i64, Box<[i64; PAGE_LEN]>>,
}

impl Memory {
    pub(crate) fn from_image(image: &[i64]) -> Self {
        let mut pages =
            FxHashMap::with_capacity_and_hasher(image.len().div_ceil(PAGE_LEN), Default::default());
        let mut base = 0;
        for chunk in &image.iter().copied().chunks(PAGE_LEN) {
            let mut page = Box::new([0; PAGE_LEN]);
            for (slot, value) in page.iter_mut().zip(chunk) {
                *slot = value;
            }
            pages.insert(base, page);
            base += PAGE_LEN as i64;
        }
        Self { pages }
    }

    pub(crate) fn get(&self, addr: i64) -> Result<i64, NegativeAddress> {
        if addr < 0 {
            return Err(NegativeAddress(addr));
        }
        Ok(self
            .pages
            .get(&(addr & !PAGE_MASK))
            .map_or(0, |page| page[(addr & PAGE_MASK) as usize]))
    }

    pub(crate) fn set(&mut self, addr: i64, value: i64) -> Result<(), NegativeAddress> {
        if addr < 0 {
            return Err(NegativeAddress(addr));
        }
        self.pages
            .entry(addr & !PAGE_MASK)
            .or_insert_with(|| Box::new([0; PAGE_LEN]))[(addr & PAGE_MASK) as usize] = value;
        Ok(())
    }

    fn populated_pages(&self) -> BTreeSet<i64> {
        self.pages
            .iter()
            .filter(|&(_, page)| page.as_ref() != &EMPTY_PAGE)
            .map(|(&base, _)| base)
            .collect()
    }
}

// pages full of zeroes compare equal to absent pages
impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        let populated = self.populated_pages();
        populated == other.populated_pages()
            && populated
                .into_iter()
                .all(|base| self.pages[&base] == other.pages[&base])
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fmtmap = f.debug_map();
        for base in self.pages.keys().copied().sorted_unstable() {
            if self.pages[&base].as_ref() != &EMPTY_PAGE {
                fmtmap.entry(
                    &format_args!("{{ page 0x{base:04x} }}"),
                    &format_args!("{:?}", self.pages[&base]),
                );
            }
        }
        fmtmap.finish()
    }
}
