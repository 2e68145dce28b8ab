/// One page of a list. Pages are 1-based and clamped into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub total: usize,
    pub start: usize,
    pub end: usize,
}

impl Page {
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.start..self.end]
    }
}

pub fn paginate(len: usize, page: usize, per_page: usize) -> Page {
    let per_page = per_page.max(1);
    let total = len.div_ceil(per_page).max(1);
    let number = page.clamp(1, total);
    let start = ((number - 1) * per_page).min(len);
    let end = (start + per_page).min(len);
    Page {
        number,
        total,
        start,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_clamp_and_cover_the_tail() {
        let items: Vec<u32> = (0..12).collect();
        let page = paginate(items.len(), 3, 5);
        assert_eq!(page.total, 3);
        assert_eq!(page.slice(&items), &[10, 11]);

        assert_eq!(paginate(12, 9, 5).number, 3);
        assert_eq!(paginate(12, 0, 5).number, 1);
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let page = paginate(0, 4, 6);
        assert_eq!((page.number, page.total), (1, 1));
        assert_eq!(page.slice::<u8>(&[]), &[] as &[u8]);
    }
}
