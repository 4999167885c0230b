//! Page cursor for the order lists
//!
//! Page 1 replaces the list, later pages append. At most one request is in
//! flight; load-more is refused while one is running or when the backend has
//! nothing left.

use shared::models::OrderPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub mode: LoadMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    page_size: u32,
    in_flight: bool,
    has_more: bool,
}

impl PageCursor {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            in_flight: false,
            has_more: true,
        }
    }

    /// Last page successfully loaded (0 before the first load)
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn begin_refresh(&mut self) -> PageRequest {
        self.in_flight = true;
        PageRequest {
            page: 1,
            mode: LoadMode::Replace,
        }
    }

    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.in_flight || !self.has_more {
            return None;
        }
        self.in_flight = true;
        Some(PageRequest {
            page: self.page + 1,
            mode: LoadMode::Append,
        })
    }

    /// Record a successful page
    pub fn finish(&mut self, request: PageRequest, returned: usize, total_pages: u32) {
        self.in_flight = false;
        self.page = request.page;
        self.has_more = !(returned < self.page_size as usize || request.page >= total_pages);
    }

    pub fn fail(&mut self) {
        self.in_flight = false;
    }

    /// Nothing more to load (e.g. the backend answered with an empty page)
    pub fn exhaust(&mut self) {
        self.in_flight = false;
        self.has_more = false;
    }
}

#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: Vec<T>,
    cursor: PageCursor,
}

impl<T> PagedList<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::new(page_size),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.cursor
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop the first item (after it was verified in place)
    pub fn remove_first(&mut self) -> Option<T> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    pub fn apply(&mut self, request: PageRequest, page: OrderPage<T>) {
        let returned = page.list.len();
        match request.mode {
            LoadMode::Replace => self.items = page.list,
            LoadMode::Append => self.items.extend(page.list),
        }
        self.cursor.finish(request, returned, page.pages);
    }
}
