use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet, VecDeque, btree_map, btree_set, vec_deque};
use std::iter::{Cloned, Map};
use std::rc::Rc;

/// 可重复遍历的区间。
///
/// 每次调用[`Range::iter`]都会得到一个从头开始的独立游标，多个游标之间不共享任何状态。
/// 元素以值的形式产出（从容器中克隆）。
pub trait Range {
    type Item;
    type Iter<'a>: Iterator<Item = Self::Item>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_>;
}

/// 借用方式持有区间，区间存活期间原容器不可修改。
impl<R: Range> Range for &R {
    type Item = R::Item;
    type Iter<'a>
        = R::Iter<'a>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        (**self).iter()
    }
}

/// 切片游标，相等当且仅当指向同一切片的同一位置。
#[derive(Debug)]
pub struct Cursor<'a, T> {
    items: &'a [T],
    pos: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(items: &'a [T]) -> Self {
        Cursor { items, pos: 0 }
    }

    pub fn is_end(&self) -> bool {
        self.pos >= self.items.len()
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        Cursor { items: self.items, pos: self.pos }
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        // 比较切片地址和长度；不同的空容器可能共用同一个悬垂地址，此时视为相等，二者都已到末尾
        std::ptr::eq(self.items, other.items) && self.pos == other.pos
    }
}

impl<T: Clone> Iterator for Cursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.get(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Cursor<'_, T> {}

impl<T: Clone> Range for Vec<T> {
    type Item = T;
    type Iter<'a>
        = Cursor<'a, T>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        Cursor::new(self.as_slice())
    }
}

impl<T: Clone, const N: usize> Range for [T; N] {
    type Item = T;
    type Iter<'a>
        = Cursor<'a, T>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        Cursor::new(self.as_slice())
    }
}

impl<T: Clone> Range for VecDeque<T> {
    type Item = T;
    type Iter<'a>
        = Cloned<vec_deque::Iter<'a, T>>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        VecDeque::iter(self).cloned()
    }
}

impl<T: Clone> Range for BTreeSet<T> {
    type Item = T;
    type Iter<'a>
        = Cloned<btree_set::Iter<'a, T>>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        BTreeSet::iter(self).cloned()
    }
}

fn clone_entry<K: Clone, V: Clone>((k, v): (&K, &V)) -> (K, V) {
    (k.clone(), v.clone())
}

/// 按键升序产出`(键, 值)`。
impl<K: Clone, V: Clone> Range for BTreeMap<K, V> {
    type Item = (K, V);
    type Iter<'a>
        = Map<btree_map::Iter<'a, K, V>, fn((&'a K, &'a V)) -> (K, V)>
    where
        Self: 'a;

    fn iter<'a>(&'a self) -> Self::Iter<'a> {
        let entry: fn((&'a K, &'a V)) -> (K, V) = clone_entry;
        BTreeMap::iter(self).map(entry)
    }
}

/// 与原持有者共享的容器。
///
/// 区间持有一个句柄，原持有者持有另一个句柄并可在两次遍历之间修改容器，修改对后续遍历可见。
/// 游标每前进一步才借用一次容器，不跨步持有借用。
#[derive(Debug, Default)]
pub struct Shared<C>(Rc<RefCell<C>>);

impl<C> Clone for Shared<C> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<C> Shared<C> {
    pub fn new(container: C) -> Self {
        Shared(Rc::new(RefCell::new(container)))
    }

    pub fn borrow(&self) -> Ref<'_, C> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, C> {
        self.0.borrow_mut()
    }
}

/// 可按位置取元素的容器，[`Shared`]的游标通过它逐步读取。
pub trait Indexed {
    type Elem;

    fn len(&self) -> usize;

    fn at(&self, pos: usize) -> Option<&Self::Elem>;
}

impl<T> Indexed for Vec<T> {
    type Elem = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn at(&self, pos: usize) -> Option<&T> {
        self.as_slice().get(pos)
    }
}

impl<T> Indexed for VecDeque<T> {
    type Elem = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn at(&self, pos: usize) -> Option<&T> {
        VecDeque::get(self, pos)
    }
}

/// 共享容器游标，相等当且仅当指向同一容器的同一位置。
#[derive(Debug)]
pub struct SharedCursor<'a, C> {
    cell: &'a RefCell<C>,
    pos: usize,
}

impl<C: Indexed> SharedCursor<'_, C> {
    pub fn is_end(&self) -> bool {
        self.pos >= self.cell.borrow().len()
    }
}

impl<C> Clone for SharedCursor<'_, C> {
    fn clone(&self) -> Self {
        SharedCursor { cell: self.cell, pos: self.pos }
    }
}

impl<C> PartialEq for SharedCursor<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.cell, other.cell) && self.pos == other.pos
    }
}

impl<C> Iterator for SharedCursor<'_, C>
where
    C: Indexed,
    C::Elem: Clone,
{
    type Item = C::Elem;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cell.borrow().at(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }
}

impl<C> Range for Shared<C>
where
    C: Indexed,
    C::Elem: Clone,
{
    type Item = C::Elem;
    type Iter<'a>
        = SharedCursor<'a, C>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        SharedCursor { cell: &self.0, pos: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_iter_is_repeatable() {
        let v = vec![1, 2, 3];
        assert_eq!(vec![1, 2, 3], Range::iter(&v).collect::<Vec<_>>());
        assert_eq!(vec![1, 2, 3], Range::iter(&v).collect::<Vec<_>>());
    }

    #[test]
    fn test_cursor_eq() {
        let v = vec![1, 2, 3];
        let mut a = Range::iter(&v);
        let b = Range::iter(&v);
        assert!(a == b);
        a.next();
        assert!(a != b);
        let mut c = b.clone();
        c.next();
        assert!(a == c);
        // 内容相同但容器不同
        let w = vec![1, 2, 3];
        assert!(Range::iter(&v) != Range::iter(&w));
        // 两个空容器的游标都在末尾，相等
        let (x, y) = (Vec::<i32>::new(), Vec::<i32>::new());
        assert!(Range::iter(&x).is_end() && Range::iter(&y).is_end());
        assert!(Range::iter(&x) == Range::iter(&y));
    }

    #[test]
    fn test_cursor_end() {
        let v = vec!["a".to_owned()];
        let mut cursor = Range::iter(&v);
        assert!(!cursor.is_end());
        assert_eq!(1, cursor.len());
        assert_eq!(Some("a".to_owned()), cursor.next());
        assert!(cursor.is_end());
        assert_eq!(None, cursor.next());
        assert_eq!(0, cursor.len());
    }

    #[test]
    fn test_empty_sources() {
        assert_eq!(0, Range::iter(&Vec::<i32>::new()).count());
        assert_eq!(0, Range::iter(&BTreeMap::<i32, i32>::new()).count());
        assert_eq!(0, Range::iter(&Shared::new(Vec::<i32>::new())).count());
    }

    #[test]
    fn test_other_sources() {
        assert_eq!(vec![3, 1, 2], Range::iter(&[3, 1, 2]).collect::<Vec<_>>());
        assert_eq!(vec![1, 2], Range::iter(&VecDeque::from([1, 2])).collect::<Vec<_>>());
        assert_eq!(vec![1, 2, 3], Range::iter(&BTreeSet::from([3, 1, 2])).collect::<Vec<_>>());
        let map = BTreeMap::from([(2, "b"), (1, "a")]);
        assert_eq!(vec![(1, "a"), (2, "b")], Range::iter(&map).collect::<Vec<_>>());
    }

    #[test]
    fn test_borrowed_range() {
        let v = vec![1, 2];
        let r = &v;
        assert_eq!(vec![1, 2], Range::iter(&r).collect::<Vec<_>>());
    }

    #[test]
    fn test_shared_sees_mutation() {
        let owner = Shared::new(vec![1, 2, 3]);
        let range = owner.clone();
        owner.borrow_mut()[0] = -1;
        assert_eq!(vec![-1, 2, 3], range.iter().collect::<Vec<_>>());
        owner.borrow_mut().push(4);
        assert_eq!(vec![-1, 2, 3, 4], range.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_shared_mutation_between_steps() {
        let owner = Shared::new(vec![1, 2, 3]);
        let range = owner.clone();
        let mut cursor = range.iter();
        assert_eq!(Some(1), cursor.next());
        owner.borrow_mut()[1] = 20;
        assert_eq!(Some(20), cursor.next());
        owner.borrow_mut().truncate(2);
        assert!(cursor.is_end());
        assert_eq!(None, cursor.next());
    }

    #[test]
    fn test_shared_deque() {
        let owner = Shared::new(VecDeque::from([2, 3]));
        let range = owner.clone();
        assert_eq!(vec![2, 3], range.iter().collect::<Vec<_>>());
        owner.borrow_mut().push_front(1);
        owner.borrow_mut().push_back(4);
        let mut cursor = range.iter();
        assert_eq!(Some(1), cursor.next());
        owner.borrow_mut().pop_back();
        assert_eq!(vec![2, 3], cursor.collect::<Vec<_>>());
    }

    #[test]
    fn test_shared_cursor_eq() {
        let a = Shared::new(vec![1]);
        let b = a.clone();
        assert!(a.iter() == b.iter());
        assert!(a.iter() != Shared::new(vec![1]).iter());
    }
}
