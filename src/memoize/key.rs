//! Memoization key derivation.
//!
//! Keys have the shape `prefix:name:arg1:arg2:k1=v1:k2=v2`. The prefix
//! segment is omitted when empty, positional arguments keep call order and
//! keyword arguments are sorted by name.

use std::collections::BTreeMap;
use std::fmt::Display;

// == Call Args ==
/// String forms of a call's arguments, as used in cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    positional: Vec<String>,
    keyword: BTreeMap<String, String>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Display) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// Sets a keyword argument. A repeated name replaces the earlier value.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.keyword.insert(name.into(), value.to_string());
        self
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Looks up a keyword argument by name.
    pub fn keyword(&self, name: &str) -> Option<&str> {
        self.keyword.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

// == Key Args Trait ==
/// Argument types that can be rendered into a memoization key.
pub trait KeyArgs {
    fn call_args(&self) -> CallArgs;
}

impl KeyArgs for CallArgs {
    fn call_args(&self) -> CallArgs {
        self.clone()
    }
}

impl KeyArgs for () {
    fn call_args(&self) -> CallArgs {
        CallArgs::new()
    }
}

macro_rules! impl_key_args_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Display),+> KeyArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn call_args(&self) -> CallArgs {
                let ($($name,)+) = self;
                CallArgs::new()$(.arg($name))+
            }
        }
    };
}

impl_key_args_for_tuple!(A);
impl_key_args_for_tuple!(A, B);
impl_key_args_for_tuple!(A, B, C);
impl_key_args_for_tuple!(A, B, C, D);

// == Derive Key ==
/// Builds the cache key for a call to `name` with `args`.
pub fn derive_key(prefix: &str, name: &str, args: &CallArgs) -> String {
    let mut key = if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}:{}", prefix, name)
    };

    if !args.positional.is_empty() {
        key.push(':');
        key.push_str(&args.positional.join(":"));
    }
    if !args.keyword.is_empty() {
        let pairs: Vec<String> = args
            .keyword
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        key.push(':');
        key.push_str(&pairs.join(":"));
    }
    key
}
