use crate::pipe::Stage;
use crate::range::Range;

/// 过滤阶段，组合后得到[`FilterRange`]。
#[derive(Debug, Clone)]
pub struct Filter<P> {
    pred: P,
}

/// 惰性过滤：只保存谓词，按上游顺序逐个判断，保留满足谓词的元素且不做转换。
pub fn filter<P>(pred: P) -> Filter<P> {
    Filter { pred }
}

impl<R, P> Stage<R> for Filter<P>
where
    R: Range,
    P: Fn(&R::Item) -> bool,
{
    type Output = FilterRange<R, P>;

    fn apply(self, range: R) -> Self::Output {
        FilterRange { range, pred: self.pred }
    }
}

pub struct FilterRange<R, P> {
    range: R,
    pred: P,
}

impl<R, P> Range for FilterRange<R, P>
where
    R: Range,
    P: Fn(&R::Item) -> bool,
{
    type Item = R::Item;
    type Iter<'a>
        = FilterIter<'a, R::Iter<'a>, P>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        FilterIter { upstream: self.range.iter(), pred: &self.pred }
    }
}

/// 过滤游标。
///
/// 是否结束以上游是否结束为准，不依赖已匹配的数量。
/// 两个游标相等当且仅当跳过不满足谓词的元素后上游游标相等，即下一个匹配元素（或上游末尾）相同。
pub struct FilterIter<'a, I, P> {
    upstream: I,
    pred: &'a P,
}

impl<I: Clone, P> Clone for FilterIter<'_, I, P> {
    fn clone(&self) -> Self {
        FilterIter { upstream: self.upstream.clone(), pred: self.pred }
    }
}

impl<I, P> PartialEq for FilterIter<'_, I, P>
where
    I: Iterator + Clone + PartialEq,
    P: Fn(&I::Item) -> bool,
{
    fn eq(&self, other: &Self) -> bool {
        self.parked() == other.parked()
    }
}

impl<I, P> FilterIter<'_, I, P>
where
    I: Iterator + Clone,
    P: Fn(&I::Item) -> bool,
{
    /// 上游停在下一个匹配元素或末尾时的游标。
    fn parked(&self) -> I {
        let mut cursor = self.upstream.clone();
        loop {
            let mut ahead = cursor.clone();
            match ahead.next() {
                Some(item) if !(self.pred)(&item) => cursor = ahead,
                _ => return cursor,
            }
        }
    }

    /// 下一个满足谓词的元素，不前进。
    pub fn current(&self) -> Option<I::Item> {
        let pred = self.pred;
        self.upstream.clone().find(|item| pred(item))
    }

    pub fn has_more(&self) -> bool {
        self.current().is_some()
    }
}

impl<I, P> Iterator for FilterIter<'_, I, P>
where
    I: Iterator,
    P: Fn(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let pred = self.pred;
        self.upstream.find(|item| pred(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }
}
