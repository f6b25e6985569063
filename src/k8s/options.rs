//! Query refinements for `get` and `list` calls.
//!
//! Each call builds an empty accumulator and applies the options in the order they were given,
//! later options overwrite the fields set by earlier ones. New refinements are added as new option
//! constructors, the signatures of the calls never change.

use kube::api::{GetParams, ListParams};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Accumulated parameters of a `get` call. `None` or an empty value means no constraint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GetOptions {
    pub resource_version: Option<String>,
}

/// Accumulated parameters of a `list` call. `None` or an empty value means no constraint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub resource_version: Option<String>,
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
    pub continue_token: Option<String>,
    pub limit: Option<u32>,
}

type Mutator<T> = Box<dyn FnOnce(&mut T) + Send>;

pub struct GetOption(Mutator<GetOptions>);

pub struct ListOption(Mutator<ListOptions>);

impl Debug for GetOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("GetOption")
    }
}

impl Debug for ListOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ListOption")
    }
}

impl GetOption {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut GetOptions) + Send + 'static,
    {
        Self(Box::new(f))
    }

    pub fn resource_version(resource_version: impl Into<String>) -> Self {
        let resource_version = resource_version.into();
        Self::new(move |opts| opts.resource_version = Some(resource_version))
    }

    pub fn apply(self, opts: &mut GetOptions) {
        (self.0)(opts)
    }
}

impl ListOption {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut ListOptions) + Send + 'static,
    {
        Self(Box::new(f))
    }

    pub fn resource_version(resource_version: impl Into<String>) -> Self {
        let resource_version = resource_version.into();
        Self::new(move |opts| opts.resource_version = Some(resource_version))
    }

    pub fn label_selector(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        Self::new(move |opts| opts.label_selector = Some(selector))
    }

    /// Label selector matching all the given labels.
    pub fn matching_labels(labels: BTreeMap<String, String>) -> Self {
        let selector = labels
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        Self::label_selector(selector)
    }

    pub fn field_selector(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        Self::new(move |opts| opts.field_selector = Some(selector))
    }

    pub fn continue_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self::new(move |opts| opts.continue_token = Some(token))
    }

    pub fn limit(limit: u32) -> Self {
        Self::new(move |opts| opts.limit = Some(limit))
    }

    pub fn apply(self, opts: &mut ListOptions) {
        (self.0)(opts)
    }
}

/// Copies every field set in `options` into the accumulator.
pub fn with_get_options(options: GetOptions) -> GetOption {
    GetOption::new(move |opts| {
        if options.resource_version.is_some() {
            opts.resource_version = options.resource_version;
        }
    })
}

/// Copies every field set in `options` into the accumulator, fields left as `None` do not clear
/// the ones applied by previous options.
pub fn with_list_options(options: ListOptions) -> ListOption {
    ListOption::new(move |opts| {
        let ListOptions {
            resource_version,
            label_selector,
            field_selector,
            continue_token,
            limit,
        } = options;

        if resource_version.is_some() {
            opts.resource_version = resource_version;
        }
        if label_selector.is_some() {
            opts.label_selector = label_selector;
        }
        if field_selector.is_some() {
            opts.field_selector = field_selector;
        }
        if continue_token.is_some() {
            opts.continue_token = continue_token;
        }
        if limit.is_some() {
            opts.limit = limit;
        }
    })
}

impl GetOptions {
    pub fn from_options(options: impl IntoIterator<Item = GetOption>) -> Self {
        let mut accumulator = Self::default();
        options
            .into_iter()
            .for_each(|option| option.apply(&mut accumulator));
        accumulator
    }
}

impl ListOptions {
    pub fn from_options(options: impl IntoIterator<Item = ListOption>) -> Self {
        let mut accumulator = Self::default();
        options
            .into_iter()
            .for_each(|option| option.apply(&mut accumulator));
        accumulator
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

impl From<&GetOptions> for GetParams {
    fn from(options: &GetOptions) -> Self {
        match non_empty(&options.resource_version) {
            Some(rv) => GetParams::at(&rv),
            None => GetParams::default(),
        }
    }
}

impl From<&ListOptions> for ListParams {
    fn from(options: &ListOptions) -> Self {
        ListParams {
            label_selector: non_empty(&options.label_selector),
            field_selector: non_empty(&options.field_selector),
            continue_token: non_empty(&options.continue_token),
            resource_version: non_empty(&options.resource_version),
            limit: options.limit.filter(|l| *l > 0),
            ..ListParams::default()
        }
    }
}
