//! Intermediate representation of generated methods.
//!
//! The compiler decides *what* a method does by building a [`GeneratedMethod`]
//! out of [`Stmt`] and [`Expr`] nodes. Turning that tree into Rust tokens is
//! the job of [`crate::render`], so both halves can be tested on their own.
//!
//! Paths inside the tree are plain strings (`"WebTarget::new"`,
//! `"crate::model::UserDto"`); the printer splits them into segments.

/// A type as it appears in a generated signature.
///
/// ## Examples
///
/// ```
/// use restgen_gen::ir::TypeRef;
///
/// let users = TypeRef::generic("Vec", vec![TypeRef::path("UserDto")]);
/// assert!(users.is_parameterized());
/// assert!(!users.is_void());
/// assert!(TypeRef::Unit.is_void());
/// assert!(TypeRef::Any.is_any());
/// assert!(TypeRef::bytes().is_bytes());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// The empty type `()`; a "void" return.
    Unit,
    /// Opaque JSON value, decoded without coercion.
    Any,
    /// A plain or qualified type path (`String`, `crate::model::UserDto`).
    Path(String),
    /// A type path with type arguments (`Vec<UserDto>`).
    Generic {
        /// Path of the generic type.
        path: String,
        /// Type arguments, in order.
        args: Vec<TypeRef>,
    },
    /// A shared reference to another type (`&str`).
    Ref(Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for [`TypeRef::Path`].
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Shorthand for [`TypeRef::Generic`].
    pub fn generic(path: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::Generic {
            path: path.into(),
            args,
        }
    }

    /// Shorthand for a reference to `inner`.
    pub fn reference(inner: TypeRef) -> Self {
        Self::Ref(Box::new(inner))
    }

    /// `Vec<u8>`.
    pub fn bytes() -> Self {
        Self::generic("Vec", vec![Self::path("u8")])
    }

    /// `&str`.
    pub fn str_ref() -> Self {
        Self::reference(Self::path("str"))
    }

    /// Returns true for the void type.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Returns true for the opaque type.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true for `Vec<u8>`, the type of raw file content.
    pub fn is_bytes(&self) -> bool {
        *self == Self::bytes()
    }

    /// Returns true for types whose arguments must be carried by a reified
    /// type token when decoding.
    pub fn is_parameterized(&self) -> bool {
        matches!(self, Self::Generic { .. })
    }
}

/// Role of a generated parameter. The declaration order of variants is the
/// order parameters appear in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKind {
    /// The request payload.
    Body,
    /// Caller-chosen media type for an untyped binary payload.
    MimeType,
    /// The query parameter object.
    QueryParameters,
    /// The header object.
    Headers,
    /// The OAuth 2.0 bearer token.
    AuthorizationToken,
}

/// One parameter of a generated method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    pub kind: ParamKind,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A local variable or `self`.
    Var(String),
    /// A string literal.
    Str(String),
    /// `None`, used as the null payload.
    None,
    /// `()`.
    Unit,
    /// `base.name`
    Field { base: Box<Expr>, name: String },
    /// `receiver.method::<turbofish>(args)` with an optional trailing `?`.
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        turbofish: Vec<TypeRef>,
        args: Vec<Expr>,
        propagate: bool,
    },
    /// `path(args)` with an optional trailing `?`, e.g. `Entity::json(&body)?`.
    Call {
        path: String,
        args: Vec<Expr>,
        propagate: bool,
    },
    /// `format!(template, args)`
    Format { template: String, args: Vec<Expr> },
    /// `Some(inner)`
    Some(Box<Expr>),
    /// `&inner`
    Ref(Box<Expr>),
    /// A path constant, e.g. `MediaType::APPLICATION_JSON`.
    Const(String),
    /// A reified generic-type token: `GenericType::<T>::new()`.
    TypeToken(TypeRef),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn constant(path: impl Into<String>) -> Self {
        Self::Const(path.into())
    }

    /// `self`
    pub fn this() -> Self {
        Self::var("self")
    }

    /// Accesses `name` on this expression.
    pub fn field(self, name: impl Into<String>) -> Self {
        Self::Field {
            base: Box::new(self),
            name: name.into(),
        }
    }

    /// Calls `method` on this expression.
    pub fn method(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::MethodCall {
            receiver: Box::new(self),
            method: method.into(),
            turbofish: Vec::new(),
            args,
            propagate: false,
        }
    }

    /// Calls an associated function or free function.
    pub fn call(path: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            path: path.into(),
            args,
            propagate: false,
        }
    }

    /// Adds type arguments to a method call. No effect on other nodes.
    pub fn with_turbofish(mut self, types: Vec<TypeRef>) -> Self {
        if let Self::MethodCall { turbofish, .. } = &mut self {
            *turbofish = types;
        }
        self
    }

    /// Marks a call as fallible, rendering a trailing `?`. No effect on
    /// non-call nodes.
    pub fn try_(mut self) -> Self {
        match &mut self {
            Self::MethodCall { propagate, .. } | Self::Call { propagate, .. } => *propagate = true,
            _ => {}
        }
        self
    }

    pub fn some(inner: Expr) -> Self {
        Self::Some(Box::new(inner))
    }

    pub fn reference(inner: Expr) -> Self {
        Self::Ref(Box::new(inner))
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `let [mut] name = value;`
    Let {
        name: String,
        mutable: bool,
        value: Expr,
    },
    /// `name = value;`
    Assign { name: String, value: Expr },
    /// `if let Some(binding) = &value { body }`: the guard-and-append pattern.
    IfSome {
        binding: String,
        value: Expr,
        body: Vec<Stmt>,
    },
    /// `if !condition { body }`
    IfNot { condition: Expr, body: Vec<Stmt> },
    /// `expr;`
    Expr(Expr),
    /// `return Err(ClientError::Api(error));`
    Raise(Expr),
    /// `Ok(value)`, as a tail expression when last in a body.
    Return(Expr),
}

impl Stmt {
    pub fn let_(name: impl Into<String>, value: Expr) -> Self {
        Self::Let {
            name: name.into(),
            mutable: false,
            value,
        }
    }

    pub fn let_mut(name: impl Into<String>, value: Expr) -> Self {
        Self::Let {
            name: name.into(),
            mutable: true,
            value,
        }
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Self::Assign {
            name: name.into(),
            value,
        }
    }
}

/// A compiled action, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMethod {
    /// Method name (the lowercased verb, plus a suffix for extra body variants).
    pub name: String,
    /// Doc comment lines.
    pub doc: Vec<String>,
    /// Parameters after `&self`, ordered by [`ParamKind`].
    pub params: Vec<Param>,
    pub statements: Vec<Stmt>,
    /// Success type of the returned `Result`.
    pub return_type: TypeRef,
    /// API error type carried by `ClientError`.
    pub error_type: TypeRef,
}

impl GeneratedMethod {
    /// Returns the parameter with the given role, if present.
    pub fn param(&self, kind: ParamKind) -> Option<&Param> {
        self.params.iter().find(|p| p.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_predicates() {
        assert!(TypeRef::Unit.is_void());
        assert!(!TypeRef::Any.is_void());
        assert!(TypeRef::Any.is_any());
        assert!(TypeRef::bytes().is_parameterized());
        assert!(!TypeRef::path("UserDto").is_parameterized());
        assert!(!TypeRef::str_ref().is_parameterized());
    }

    #[test]
    fn param_kinds_order_signatures() {
        let mut kinds = vec![
            ParamKind::AuthorizationToken,
            ParamKind::Headers,
            ParamKind::Body,
            ParamKind::QueryParameters,
            ParamKind::MimeType,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                ParamKind::Body,
                ParamKind::MimeType,
                ParamKind::QueryParameters,
                ParamKind::Headers,
                ParamKind::AuthorizationToken,
            ]
        );
    }

    #[test]
    fn try_marks_only_calls() {
        let call = Expr::call("Entity::json", vec![]).try_();
        assert!(matches!(call, Expr::Call { propagate: true, .. }));

        let var = Expr::var("body").try_();
        assert_eq!(var, Expr::var("body"));
    }

    #[test]
    fn turbofish_attaches_to_method_calls() {
        let read = Expr::var("response")
            .method("read_entity", vec![])
            .with_turbofish(vec![TypeRef::path("UserDto")]);
        match read {
            Expr::MethodCall { turbofish, .. } => assert_eq!(turbofish, vec![TypeRef::path("UserDto")]),
            other => panic!("unexpected node: {other:?}"),
        }
    }
}
