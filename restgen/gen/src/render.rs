//! Printer for the intermediate representation.
//!
//! Renders [`GeneratedMethod`] trees into `proc_macro2` tokens. The printer
//! makes no decisions of its own: it prints exactly the statements it is
//! given, in order. Two conventions are fixed here:
//!
//! - a trailing [`Stmt::Return`] becomes the tail expression `Ok(..)`
//! - [`Stmt::Raise`] becomes `return Err(ClientError::Api(..));`

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::Parser;

use crate::ir::{Expr, GeneratedMethod, Param, Stmt, TypeRef};
use crate::naming::type_name;

/// Renders a `::`-separated path into tokens.
///
/// Segments that do not lex as one identifier (`User Dto`) are rewritten
/// with [`type_name`].
///
/// ## Examples
///
/// ```
/// use restgen_gen::render::path_tokens;
///
/// let tokens = path_tokens("crate::shared::WebTarget");
/// assert_eq!(tokens.to_string(), quote::quote!(crate::shared::WebTarget).to_string());
/// ```
pub fn path_tokens(path: &str) -> TokenStream {
    let segments = path
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(path_segment);
    quote! { #(#segments)::* }
}

fn path_segment(segment: &str) -> Ident {
    Ident::parse_any
        .parse_str(segment.trim())
        .unwrap_or_else(|_| format_ident!("{}", type_name(segment)))
}

/// Renders a type.
pub fn render_type(ty: &TypeRef) -> TokenStream {
    match ty {
        TypeRef::Unit => quote! { () },
        TypeRef::Any => quote! { serde_json::Value },
        TypeRef::Path(path) => path_tokens(path),
        TypeRef::Generic { path, args } => {
            let path = path_tokens(path);
            let args = args.iter().map(render_type);
            quote! { #path<#(#args),*> }
        }
        TypeRef::Ref(inner) => {
            let inner = render_type(inner);
            quote! { &#inner }
        }
    }
}

/// Renders an expression.
pub fn render_expr(expr: &Expr) -> TokenStream {
    match expr {
        Expr::Var(name) => {
            let ident = format_ident!("{}", name);
            quote! { #ident }
        }
        Expr::Str(value) => quote! { #value },
        Expr::None => quote! { None },
        Expr::Unit => quote! { () },
        Expr::Field { base, name } => {
            let base = render_expr(base);
            let name = format_ident!("{}", name);
            quote! { #base.#name }
        }
        Expr::MethodCall {
            receiver,
            method,
            turbofish,
            args,
            propagate,
        } => {
            let receiver = render_expr(receiver);
            let method = format_ident!("{}", method);
            let args = args.iter().map(render_expr);
            let turbofish = if turbofish.is_empty() {
                TokenStream::new()
            } else {
                let types = turbofish.iter().map(render_type);
                quote! { ::<#(#types),*> }
            };
            let question = propagate_token(*propagate);
            quote! { #receiver.#method #turbofish(#(#args),*) #question }
        }
        Expr::Call {
            path,
            args,
            propagate,
        } => {
            let path = path_tokens(path);
            let args = args.iter().map(render_expr);
            let question = propagate_token(*propagate);
            quote! { #path(#(#args),*) #question }
        }
        Expr::Format { template, args } => {
            let args = args.iter().map(render_expr);
            quote! { format!(#template, #(#args),*) }
        }
        Expr::Some(inner) => {
            let inner = render_expr(inner);
            quote! { Some(#inner) }
        }
        Expr::Ref(inner) => {
            let inner = render_expr(inner);
            quote! { &#inner }
        }
        Expr::Const(path) => path_tokens(path),
        Expr::TypeToken(ty) => {
            let ty = render_type(ty);
            quote! { GenericType::<#ty>::new() }
        }
    }
}

fn propagate_token(propagate: bool) -> TokenStream {
    if propagate { quote! { ? } } else { TokenStream::new() }
}

/// Renders a statement list. A trailing `Return` becomes a tail expression.
pub fn render_block(statements: &[Stmt]) -> TokenStream {
    let last = statements.len().saturating_sub(1);
    statements
        .iter()
        .enumerate()
        .map(|(idx, stmt)| render_stmt(stmt, idx == last))
        .collect()
}

fn render_stmt(stmt: &Stmt, is_tail: bool) -> TokenStream {
    match stmt {
        Stmt::Let {
            name,
            mutable,
            value,
        } => {
            let name = format_ident!("{}", name);
            let value = render_expr(value);
            if *mutable {
                quote! { let mut #name = #value; }
            } else {
                quote! { let #name = #value; }
            }
        }
        Stmt::Assign { name, value } => {
            let name = format_ident!("{}", name);
            let value = render_expr(value);
            quote! { #name = #value; }
        }
        Stmt::IfSome {
            binding,
            value,
            body,
        } => {
            let binding = format_ident!("{}", binding);
            let value = render_expr(value);
            let body = render_nested(body);
            quote! {
                if let Some(#binding) = &#value {
                    #body
                }
            }
        }
        Stmt::IfNot { condition, body } => {
            let condition = render_expr(condition);
            let body = render_nested(body);
            quote! {
                if !#condition {
                    #body
                }
            }
        }
        Stmt::Expr(expr) => {
            let expr = render_expr(expr);
            quote! { #expr; }
        }
        Stmt::Raise(error) => {
            let error = render_expr(error);
            quote! { return Err(ClientError::Api(#error)); }
        }
        Stmt::Return(value) => {
            let value = render_expr(value);
            if is_tail {
                quote! { Ok(#value) }
            } else {
                quote! { return Ok(#value); }
            }
        }
    }
}

// Nested blocks never end in a tail expression.
fn render_nested(statements: &[Stmt]) -> TokenStream {
    statements
        .iter()
        .map(|stmt| render_stmt(stmt, false))
        .collect()
}

fn render_param(param: &Param) -> TokenStream {
    let name = format_ident!("{}", param.name);
    let ty = render_type(&param.ty);
    quote! { #name: #ty }
}

/// Renders a complete method for an `impl` block.
pub fn render_method(method: &GeneratedMethod) -> TokenStream {
    let name = format_ident!("{}", method.name);
    let docs = method.doc.iter().map(|line| {
        let line = format!(" {line}");
        quote! { #[doc = #line] }
    });
    let params = method.params.iter().map(render_param);
    let return_type = render_type(&method.return_type);
    let error_type = render_type(&method.error_type);
    let body = render_block(&method.statements);

    quote! {
        #(#docs)*
        pub fn #name(&self, #(#params),*) -> Result<#return_type, ClientError<#error_type>> {
            #body
        }
    }
}
