/// Concatenates supplied slices into one continuous vector.
#[macro_export]
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Implements `Deref`/`DerefMut` traits for the supplied wrapper and type.
#[macro_export]
macro_rules! impl_deref {
    ($wrapper: ident$(<$($gen: ident: $($bound: path),+),*>)?($inner: ty)) => {
        impl$(<$($gen: $($bound)++),+>)* core::ops::Deref for $wrapper$(<$($gen),+>)* {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl$(<$($gen: $($bound)++),+>)* core::ops::DerefMut for $wrapper$(<$($gen),+>)* {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}

/// Calculates the product of pairing for supplied pairs.
/// ```compile_fail
/// multi_pairing! {
///     a, c;
///     b, d
/// }
/// ```
/// Will be transformed to:
/// ```compile_fail
/// E::multi_pairing([a, b], [c, d])
/// ```
#[macro_export]
macro_rules! multi_pairing {
    ($($g1: expr, $g2: expr);+) => {
        $crate::multi_pairing! { using E: $($g1, $g2);+ }
    };
    (using $pairing_engine: path: $($g1: expr, $g2: expr);+) => {
        <$pairing_engine>::multi_pairing(
            [
                $($g1.into()),+
            ],
            [
                $($g2.into()),+
            ]
        )
    }
}

/// Flattened `rayon::join(|| expr1, || rayon::join(|| expr2, || ...))`
#[cfg(feature = "parallel")]
#[macro_export]
macro_rules! join {
    (@ $a: expr) => { $a };
    (@ $a: expr, $b: expr) => {
        rayon::join(|| $a, || $b)
    };
    (@ $a: expr, $b: expr, $($c: expr),+) => {{
        join!(@ $a, join!(@ $b, $($c),+))
    }};
    ($($e: expr),+) => {{
        $crate::unnest_tuple!(
            $($e),+
            =>
            join!(@ $($e),+)
        )
    }}
}

/// `(expr1, expr2, expr3...)`
#[cfg(not(feature = "parallel"))]
#[macro_export]
macro_rules! join {
    ($($e: expr),+) => {
        ($($e),+)
    };
}

/// `(a, (b, c)) => (a, b, c)`
#[macro_export]
macro_rules! unnest_tuple {
    ($a: expr => $v: expr) => {{
        $v
    }};
    ($a: expr, $b: expr => $v: expr) => {{
        let (_a, _b) = $v;

        (_a, _b)
    }};
    ($a: expr, $b: expr, $c: expr => $v: expr) => {{
        let (_a, (_b, _c)) = $v;

        (_a, _b, _c)
    }};
    ($a: expr, $b: expr, $c: expr, $d: expr => $v: expr) => {{
        let (_a, (_b, (_c, _d))) = $v;

        (_a, _b, _c, _d)
    }};
}
