use crate::pipe::Stage;
use crate::range::Range;
use std::ops::Add;

/// 以`+`累加的归约，见[`reduce`]。
#[derive(Debug, Clone)]
pub struct Reduce<T> {
    initial: T,
}

/// 以自定义二元函数累加的归约，见[`reduce_with`]。
#[derive(Debug, Clone)]
pub struct ReduceWith<T, F> {
    initial: T,
    func: F,
}

/// 从`initial`开始按顺序累加区间全部元素，立即求值。
pub fn reduce<T>(initial: T) -> Reduce<T> {
    Reduce { initial }
}

/// 从`initial`开始严格从左到右执行`acc = func(acc, item)`，立即求值。
///
/// ```
/// use fpipe::{RangeExt, reduce_with};
///
/// let digits = vec![1, 2, 3].pipe(reduce_with(0, |acc: i64, x: i64| acc * 10 + x));
/// assert_eq!(123, digits);
/// ```
pub fn reduce_with<T, F>(initial: T, func: F) -> ReduceWith<T, F> {
    ReduceWith { initial, func }
}

impl<R, T> Stage<R> for Reduce<T>
where
    R: Range,
    T: Add<R::Item, Output = T>,
{
    type Output = T;

    fn apply(self, range: R) -> T {
        range.iter().fold(self.initial, |acc, item| acc + item)
    }
}

impl<R, T, F> Stage<R> for ReduceWith<T, F>
where
    R: Range,
    F: FnMut(T, R::Item) -> T,
{
    type Output = T;

    fn apply(self, range: R) -> T {
        let mut func = self.func;
        let mut acc = self.initial;
        for item in range.iter() {
            acc = func(acc, item);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::RangeExt;
    use crate::range::Shared;
    use crate::view::{filter, keys, transform, values};
    use std::collections::BTreeMap;

    #[test]
    fn test_reduce_keys_values() {
        let map = (0..1024).map(|i| (i, 2 * i)).collect::<BTreeMap<i32, i32>>();
        assert_eq!((0 + 1023) * 1024 / 2, (&map).pipe(keys()).pipe(reduce(0)));
        assert_eq!((0 + 2046) * 1024 / 2, (&map).pipe(values()).pipe(reduce(0)));
    }

    #[test]
    fn test_reduce_empty() {
        assert_eq!(7, Vec::<i32>::new().pipe(reduce(7)));
        assert_eq!("init", Vec::<i32>::new().pipe(reduce_with("init".to_owned(), |acc: String, _: i32| acc + "x")));
    }

    #[test]
    fn test_reduce_float() {
        assert_eq!(3.5, vec![1.0, 2.5].pipe(reduce(0.0)));
    }

    #[test]
    fn test_reduce_with_is_left_fold() {
        let base = vec![100, 10, 5, 2];
        // 减法不满足结合律
        assert_eq!(((0 - 100) - 10 - 5) - 2, (&base).pipe(reduce_with(0, |acc: i32, x: i32| acc - x)));
        assert_eq!(
            "((((s,100),10),5),2)",
            (&base).pipe(reduce_with("s".to_owned(), |acc: String, x: i32| format!("({acc},{x})")))
        );
    }

    #[test]
    fn test_reduce_string_concat() {
        let words = vec!["a", "b", "c"];
        assert_eq!("abc", words.pipe(reduce(String::new())));
    }

    #[test]
    fn test_reduce_over_pipeline() {
        let base = Shared::new(vec![1, 2, 3, 4]);
        let squares = base.clone().pipe(transform(|x: i32| x * x));
        assert_eq!(30, (&squares).pipe(reduce(0)));
        base.borrow_mut().push(5);
        assert_eq!(55, (&squares).pipe(reduce(0)));
        let odd = base.clone().pipe(filter(|x: &i32| x % 2 == 1));
        assert_eq!(vec![1, 3, 5], odd.pipe(reduce_with(Vec::new(), |mut acc: Vec<i32>, x| {
            acc.push(x);
            acc
        })));
    }

    #[test]
    #[should_panic(expected = "bad element")]
    fn test_reduce_panic_propagates() {
        vec![1, 2, 3].pipe(reduce_with(0, |acc: i32, x: i32| if x == 2 { panic!("bad element") } else { acc + x }));
    }
}
