use crate::range::Range;

/// 流水线阶段。
///
/// 阶段与上游区间组合后得到新的区间（惰性阶段）或直接得到结果（终结操作）。
/// 阶段函数能否接受上游元素类型由各实现的约束在组合时检查。
pub trait Stage<R> {
    type Output;

    fn apply(self, range: R) -> Self::Output;
}

pub trait RangeExt: Range + Sized {
    /// 以当前区间为上游组合阶段，组合后的结果拥有当前区间。
    fn pipe<S: Stage<Self>>(self, stage: S) -> S::Output {
        stage.apply(self)
    }
}

impl<R: Range> RangeExt for R {}

/// [`RangeExt::pipe`]的函数形式。
pub fn compose<R: Range, S: Stage<R>>(range: R, stage: S) -> S::Output {
    stage.apply(range)
}
