//! Structural query document model.

use std::fmt;

use indexmap::IndexMap;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn default_root(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldSelection {
    pub alias: Option<String>,
    pub name: String,
    /// Directive names, arguments dropped.
    pub directives: Vec<String>,
    pub selection_set: Vec<Selection>,
}

impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            directives: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn directive(mut self, name: impl Into<String>) -> Self {
        self.directives.push(name.into());
        self
    }

    pub fn select(mut self, selections: impl IntoIterator<Item = Selection>) -> Self {
        self.selection_set.extend(selections);
        self
    }

    /// Key under which the field appears in the result.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Selection {
    Field(FieldSelection),
    FragmentSpread {
        name: String,
        directives: Vec<String>,
    },
    InlineFragment {
        type_condition: Option<String>,
        directives: Vec<String>,
        selection_set: Vec<Selection>,
    },
}

impl Selection {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(FieldSelection::new(name))
    }

    pub fn spread(name: impl Into<String>) -> Self {
        Self::FragmentSpread {
            name: name.into(),
            directives: Vec::new(),
        }
    }
}

impl From<FieldSelection> for Selection {
    fn from(field: FieldSelection) -> Self {
        Self::Field(field)
    }
}

/// `@skip` and `@include` make a selection conditional.
pub fn is_conditional(directives: &[String]) -> bool {
    directives.iter().any(|d| d == "skip" || d == "include")
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Operation {
    pub name: Option<String>,
    pub kind: OperationKind,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fragment {
    pub name: String,
    pub type_condition: String,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Document {
    pub operations: Vec<Operation>,
    pub fragments: IndexMap<String, Fragment>,
}

impl Document {
    /// Document with a single anonymous query.
    pub fn query(selection_set: Vec<Selection>) -> Self {
        Self {
            operations: vec![Operation {
                name: None,
                kind: OperationKind::Query,
                selection_set,
            }],
            fragments: IndexMap::new(),
        }
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.insert(fragment.name.clone(), fragment);
        self
    }
}
