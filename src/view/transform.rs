use crate::pipe::Stage;
use crate::range::Range;

/// 转换阶段，组合后得到[`TransformRange`]。
#[derive(Debug, Clone)]
pub struct Transform<F> {
    func: F,
}

/// 惰性转换：只保存函数，每次产出元素时对上游当前元素重新调用函数。
///
/// ```
/// use fpipe::{Range, RangeExt, transform};
///
/// let doubled = vec![1, 2, 3].pipe(transform(|x: i32| 2 * x));
/// assert_eq!(vec![2, 4, 6], doubled.iter().collect::<Vec<_>>());
/// ```
pub fn transform<F>(func: F) -> Transform<F> {
    Transform { func }
}

/// 取键值对的第一个分量。
pub fn keys<K, V>() -> Transform<fn((K, V)) -> K> {
    let project: fn((K, V)) -> K = |(k, _)| k;
    transform(project)
}

/// 取键值对的第二个分量。
pub fn values<K, V>() -> Transform<fn((K, V)) -> V> {
    let project: fn((K, V)) -> V = |(_, v)| v;
    transform(project)
}

impl<R, F, O> Stage<R> for Transform<F>
where
    R: Range,
    F: Fn(R::Item) -> O,
{
    type Output = TransformRange<R, F>;

    fn apply(self, range: R) -> Self::Output {
        TransformRange { range, func: self.func }
    }
}

/// 拥有上游区间和转换函数的惰性区间。
pub struct TransformRange<R, F> {
    range: R,
    func: F,
}

impl<R, F, O> Range for TransformRange<R, F>
where
    R: Range,
    F: Fn(R::Item) -> O,
{
    type Item = O;
    type Iter<'a>
        = TransformIter<'a, R::Iter<'a>, F>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        TransformIter { upstream: self.range.iter(), func: &self.func }
    }
}

/// 转换游标。
///
/// 前进只推进上游游标，不缓存任何值；两个游标相等当且仅当上游游标相等。
pub struct TransformIter<'a, I, F> {
    upstream: I,
    func: &'a F,
}

impl<I: Clone, F> Clone for TransformIter<'_, I, F> {
    fn clone(&self) -> Self {
        TransformIter { upstream: self.upstream.clone(), func: self.func }
    }
}

impl<I: PartialEq, F> PartialEq for TransformIter<'_, I, F> {
    fn eq(&self, other: &Self) -> bool {
        self.upstream == other.upstream
    }
}

impl<I, F, O> TransformIter<'_, I, F>
where
    I: Iterator + Clone,
    F: Fn(I::Item) -> O,
{
    /// 计算当前位置的元素但不前进，每次调用都会重新调用转换函数。
    pub fn current(&self) -> Option<O> {
        self.upstream.clone().next().map(self.func)
    }
}

impl<I, F, O> Iterator for TransformIter<'_, I, F>
where
    I: Iterator,
    F: Fn(I::Item) -> O,
{
    type Item = O;

    fn next(&mut self) -> Option<Self::Item> {
        self.upstream.next().map(self.func)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}
