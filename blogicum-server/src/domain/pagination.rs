use super::error::DomainError;

pub(crate) const PAGE_SIZE: u32 = 10;

/// Page selector taken from the `page` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageRequest {
    Number(u32),
    Last,
}

impl PageRequest {
    /// Absent or empty means the first page. `last` selects the final page.
    /// Anything else has to be a positive integer.
    pub(crate) fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(PageRequest::Number(1));
        };
        if raw == "last" {
            return Ok(PageRequest::Last);
        }
        match raw.parse::<u32>() {
            Ok(number) if number >= 1 => Ok(PageRequest::Number(number)),
            _ => Err(DomainError::NotFound(format!("page: {raw}"))),
        }
    }
}

/// A resolved page: its 1-based number plus the window to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) number: u32,
    pub(crate) num_pages: u32,
    pub(crate) total: i64,
    pub(crate) limit: i64,
    pub(crate) offset: i64,
}

impl PageWindow {
    /// An empty listing still has a first page.
    pub(crate) fn resolve(request: PageRequest, total: i64) -> Result<Self, DomainError> {
        let total = total.max(0);
        let per_page = i64::from(PAGE_SIZE);
        let num_pages = u32::try_from(((total + per_page - 1) / per_page).max(1))
            .map_err(|_| DomainError::Unexpected(format!("too many pages for {total} rows")))?;

        let number = match request {
            PageRequest::Last => num_pages,
            PageRequest::Number(number) if number <= num_pages => number,
            PageRequest::Number(number) => {
                return Err(DomainError::NotFound(format!("page: {number}")));
            }
        };

        Ok(Self {
            number,
            num_pages,
            total,
            limit: per_page,
            offset: i64::from(number - 1) * per_page,
        })
    }

    pub(crate) fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) number: u32,
    pub(crate) num_pages: u32,
    pub(crate) total: i64,
}

impl<T> Page<T> {
    pub(crate) fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub(crate) fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}
