use symbology::Category;

const FULL_MASK: u16 = (1u16 << Category::COUNT) - 1;

/// Set of ownership categories backed by a bitset.
///
/// Membership is tracked by `Category::index()`, so the set can never hold a
/// value outside the fixed enumeration or hold one twice.
///
/// Ordering contract:
/// - Iteration yields categories in declaration (legend) order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CategorySet {
    bits: u16,
}

impl CategorySet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub const fn all() -> Self {
        Self { bits: FULL_MASK }
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn is_full(&self) -> bool {
        self.bits == FULL_MASK
    }

    pub fn contains(&self, category: Category) -> bool {
        (self.bits & bit(category)) != 0
    }

    /// Inserts `category` into the set.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, category: Category) -> bool {
        let before = self.bits;
        self.bits |= bit(category);
        self.bits != before
    }

    /// Removes `category` from the set.
    ///
    /// Returns `true` if the set changed.
    pub fn remove(&mut self, category: Category) -> bool {
        let before = self.bits;
        self.bits &= !bit(category);
        self.bits != before
    }

    /// Sets membership of `category`; returns `true` if the set changed.
    pub fn set(&mut self, category: Category, member: bool) -> bool {
        if member {
            self.insert(category)
        } else {
            self.remove(category)
        }
    }

    /// Iterates members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = Self::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

fn bit(category: Category) -> u16 {
    1u16 << category.index()
}
