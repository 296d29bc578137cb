//! Paged, append-only row table.
//!
//! Row `n` always lives at page `n / ROWS_PER_PAGE`, byte offset
//! `(n % ROWS_PER_PAGE) * ROW_SIZE`. Pages are zero-filled and allocated on
//! first touch; once allocated they are never moved or freed.

use std::iter::FusedIterator;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{DbError, TableError};
use crate::row::Row;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_PAGES, TABLE_MAX_ROWS};

type Page = Box<[u8; PAGE_SIZE]>;

/// Physical address of a row slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLocation {
    pub page: usize,
    pub offset: usize,
}

impl SlotLocation {
    pub fn of(row_num: usize) -> Self {
        Self {
            page: row_num / ROWS_PER_PAGE,
            offset: (row_num % ROWS_PER_PAGE) * ROW_SIZE,
        }
    }
}

#[derive(Debug)]
pub struct Table {
    num_rows: usize,
    max_pages: usize,
    max_rows: usize,
    pages: Vec<Option<Page>>,
}

impl Table {
    pub fn new(config: &Config) -> Result<Self, DbError> {
        if config.max_pages == 0 {
            return Err(DbError::Config("max_pages must be at least 1".to_string()));
        }
        let max_rows = config.max_pages.checked_mul(ROWS_PER_PAGE).ok_or_else(|| {
            DbError::Config(format!("max_pages {} overflows row capacity", config.max_pages))
        })?;

        Ok(Self {
            num_rows: 0,
            max_pages: config.max_pages,
            max_rows,
            pages: Vec::new(),
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn is_full(&self) -> bool {
        self.num_rows >= self.max_rows()
    }

    /// Number of pages that have been materialized so far.
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Appends `row` at index `num_rows`.
    pub fn insert(&mut self, row: &Row) -> Result<(), TableError> {
        if self.is_full() {
            warn!(max_rows = self.max_rows(), "table full, rejecting insert");
            return Err(TableError::Full {
                max_rows: self.max_rows(),
            });
        }

        let row_num = self.num_rows;
        row.serialize(self.row_slot_mut(row_num));
        self.num_rows += 1;

        debug!(row_num, id = row.id, "inserted row");
        Ok(())
    }

    /// Decodes the row stored at `row_num`, if it has been written.
    pub fn row(&self, row_num: usize) -> Option<Row> {
        if row_num >= self.num_rows {
            return None;
        }
        self.row_slot(row_num).map(Row::deserialize)
    }

    /// Iterates every stored row in insertion order.
    pub fn scan(&self) -> Scan<'_> {
        Scan {
            table: self,
            next: 0,
        }
    }

    fn row_slot(&self, row_num: usize) -> Option<&[u8]> {
        let SlotLocation { page, offset } = SlotLocation::of(row_num);
        let page = self.pages.get(page)?.as_deref()?;
        Some(&page[offset..offset + ROW_SIZE])
    }

    /// Mutable slot for `row_num`, allocating its page if needed.
    ///
    /// # Panics
    ///
    /// Panics if the row maps past `max_pages`.
    fn row_slot_mut(&mut self, row_num: usize) -> &mut [u8] {
        let SlotLocation { page, offset } = SlotLocation::of(row_num);
        assert!(
            page < self.max_pages,
            "row {row_num} maps to page {page}, past max_pages {}",
            self.max_pages
        );

        if self.pages.len() <= page {
            self.pages.resize_with(page + 1, || None);
        }
        let buf = self.pages[page].get_or_insert_with(|| {
            debug!(page, "allocating page");
            Box::new([0u8; PAGE_SIZE])
        });

        &mut buf[offset..offset + ROW_SIZE]
    }
}

impl Default for Table {
    fn default() -> Self {
        Self {
            num_rows: 0,
            max_pages: TABLE_MAX_PAGES,
            max_rows: TABLE_MAX_ROWS,
            pages: Vec::new(),
        }
    }
}

/// Sequential scan over a [`Table`], from row 0 up to the row count.
pub struct Scan<'a> {
    table: &'a Table,
    next: usize,
}

impl Iterator for Scan<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.table.row(self.next)?;
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.num_rows.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Scan<'_> {}

impl FusedIterator for Scan<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(i: usize) -> Row {
        Row::new(i as u32, &format!("user{i}"), &format!("person{i}@example.com")).unwrap()
    }

    #[test]
    fn it_fits_fourteen_rows_per_page() {
        assert_eq!(ROW_SIZE, 291);
        assert_eq!(ROWS_PER_PAGE, 14);
        assert_eq!(TABLE_MAX_ROWS, 1400);
    }

    #[test]
    fn it_maps_row_indices_to_page_and_offset() {
        assert_eq!(SlotLocation::of(0), SlotLocation { page: 0, offset: 0 });
        assert_eq!(SlotLocation::of(1), SlotLocation { page: 0, offset: 291 });
        assert_eq!(SlotLocation::of(13), SlotLocation { page: 0, offset: 13 * 291 });
        assert_eq!(SlotLocation::of(14), SlotLocation { page: 1, offset: 0 });
        assert_eq!(SlotLocation::of(1399), SlotLocation { page: 99, offset: 13 * 291 });

        for i in 0..TABLE_MAX_ROWS {
            let loc = SlotLocation::of(i);
            assert_eq!(loc.page, i / 14);
            assert_eq!(loc.offset, (i % 14) * 291);
            assert!(loc.offset + ROW_SIZE <= PAGE_SIZE);
        }
    }

    #[test]
    fn it_starts_empty_with_no_pages() {
        let table = Table::default();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.allocated_pages(), 0);
        assert_eq!(table.scan().count(), 0);
        assert_eq!(table.row(0), None);
    }

    #[test]
    fn it_allocates_pages_lazily() {
        let mut table = Table::default();
        table.insert(&user(0)).unwrap();
        assert_eq!(table.allocated_pages(), 1);

        for i in 1..ROWS_PER_PAGE {
            table.insert(&user(i)).unwrap();
        }
        assert_eq!(table.allocated_pages(), 1);

        table.insert(&user(ROWS_PER_PAGE)).unwrap();
        assert_eq!(table.allocated_pages(), 2);
    }

    #[test]
    fn it_allocates_only_the_addressed_page() {
        let mut table = Table::default();
        table.row_slot_mut(5 * ROWS_PER_PAGE);

        assert_eq!(table.allocated_pages(), 1);
        assert!(table.pages[5].is_some());
        assert!(table.pages[..5].iter().all(Option::is_none));
    }

    #[test]
    fn it_returns_the_same_storage_for_the_same_slot() {
        let mut table = Table::default();
        table.row_slot_mut(20).fill(0x5a);

        assert!(table.row_slot_mut(20).iter().all(|&b| b == 0x5a));
        assert!(table.row_slot(20).unwrap().iter().all(|&b| b == 0x5a));
        // neighbours untouched
        assert!(table.row_slot(19).unwrap().iter().all(|&b| b == 0));
        assert!(table.row_slot(21).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn it_scans_in_insertion_order() {
        let mut table = Table::default();
        let first = Row::new(2, "second_id_first", "x@y.z").unwrap();
        let second = Row::new(1, "first_id_second", "y@z.x").unwrap();
        table.insert(&first).unwrap();
        table.insert(&second).unwrap();

        let rows: Vec<Row> = table.scan().collect();
        assert_eq!(rows, vec![first, second]);
    }

    #[test]
    fn it_restarts_scans() {
        let mut table = Table::default();
        for i in 0..30 {
            table.insert(&user(i)).unwrap();
        }

        let mut scan = table.scan();
        assert_eq!(scan.len(), 30);
        assert_eq!(scan.next(), Some(user(0)));
        assert_eq!(scan.len(), 29);

        assert_eq!(table.scan().count(), 30);
        assert_eq!(table.scan().last(), Some(user(29)));
    }

    #[test]
    fn it_reads_rows_by_index() {
        let mut table = Table::default();
        for i in 0..20 {
            table.insert(&user(i)).unwrap();
        }

        assert_eq!(table.row(15), Some(user(15)));
        assert_eq!(table.row(20), None);
    }

    #[test]
    fn it_fills_exactly_to_capacity() {
        let mut table = Table::default();
        for i in 0..TABLE_MAX_ROWS {
            table.insert(&user(i)).unwrap();
        }
        assert!(table.is_full());
        assert_eq!(table.allocated_pages(), 100);

        assert_eq!(
            table.insert(&user(TABLE_MAX_ROWS)),
            Err(TableError::Full {
                max_rows: TABLE_MAX_ROWS
            })
        );
        assert_eq!(table.num_rows(), TABLE_MAX_ROWS);
        assert_eq!(table.scan().count(), TABLE_MAX_ROWS);
        assert_eq!(table.scan().last(), Some(user(TABLE_MAX_ROWS - 1)));
    }

    #[test]
    fn it_honours_a_configured_page_ceiling() {
        let config = Config::builder().max_pages(2).build();
        let mut table = Table::new(&config).unwrap();
        assert_eq!(table.max_rows(), 28);

        for i in 0..28 {
            table.insert(&user(i)).unwrap();
        }
        assert_eq!(table.insert(&user(28)), Err(TableError::Full { max_rows: 28 }));
        assert_eq!(table.allocated_pages(), 2);
    }

    #[test]
    fn it_rejects_zero_pages() {
        let config = Config::builder().max_pages(0).build();
        assert!(matches!(Table::new(&config), Err(DbError::Config(_))));
    }

    #[test]
    fn it_rejects_page_ceilings_that_overflow_row_capacity() {
        let config = Config::builder().max_pages(usize::MAX).build();
        let err = Table::new(&config).unwrap_err();
        assert!(matches!(err, DbError::Config(msg) if msg.contains("overflows")));

        let largest = usize::MAX / ROWS_PER_PAGE;
        let config = Config::builder().max_pages(largest).build();
        let mut table = Table::new(&config).unwrap();
        assert_eq!(table.max_rows(), largest * ROWS_PER_PAGE);

        table.insert(&user(0)).unwrap();
        assert_eq!(table.num_rows(), 1);
        assert!(!table.is_full());
    }

    #[test]
    #[should_panic(expected = "past max_pages")]
    fn it_panics_when_addressing_past_the_ceiling() {
        let config = Config::builder().max_pages(1).build();
        let mut table = Table::new(&config).unwrap();
        table.row_slot_mut(ROWS_PER_PAGE);
    }
}
