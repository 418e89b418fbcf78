// src/parser.rs
use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser as SwcParser, StringInput, Syntax, TsConfig};
use swc_ecma_visit::{Visit, VisitWith};

use std::fs;
use std::path::Path;

use crate::error::{Result, ViewsError};
use crate::model::ClientViewConfig;

/// What a single view module declares about itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewModule {
    /// Fields read from `export const config = { ... }`.
    pub config: ClientViewConfig,
    /// Name of the default-exported component, if it has one.
    pub component_name: Option<String>,
}

/// Walks a module looking for the exported `config` object and the default
/// export.
struct ViewConfigVisitor<'a> {
    path: &'a Path,
    module: ViewModule,
}

impl<'a> ViewConfigVisitor<'a> {
    fn new(path: &'a Path) -> Self {
        ViewConfigVisitor {
            path,
            module: ViewModule::default(),
        }
    }

    /// Reads the supported keys of a config object literal. Anything the
    /// router does not understand is skipped with a warning.
    fn read_config_object(&mut self, obj_lit: &ObjectLit) {
        for prop in &obj_lit.props {
            let PropOrSpread::Prop(boxed_prop) = prop else {
                tracing::warn!(path = %self.path.display(), "spread in view config is ignored");
                continue;
            };
            let Prop::KeyValue(KeyValueProp { key, value }) = &**boxed_prop else {
                continue;
            };
            let Some(key_name) = prop_name(key) else {
                continue;
            };
            let value = unwrap_ts_expr(value);

            match key_name.as_str() {
                "title" => match string_value(value) {
                    Some(s) => self.module.config.title = Some(s),
                    None => self.warn_invalid(&key_name),
                },
                "route" => match string_value(value) {
                    Some(s) => self.module.config.route = Some(s),
                    None => self.warn_invalid(&key_name),
                },
                "lazy" => match bool_value(value) {
                    Some(b) => self.module.config.lazy = b,
                    None => self.warn_invalid(&key_name),
                },
                "loginRequired" => match bool_value(value) {
                    Some(b) => self.module.config.login_required = b,
                    None => self.warn_invalid(&key_name),
                },
                "rolesAllowed" => match string_array(value) {
                    Some(roles) => self.module.config.roles_allowed = Some(roles),
                    None => self.warn_invalid(&key_name),
                },
                other => {
                    tracing::debug!(path = %self.path.display(), key = other, "unknown view config key");
                }
            }
        }
    }

    fn warn_invalid(&self, key: &str) {
        tracing::warn!(
            path = %self.path.display(),
            key,
            "view config value is not a literal of the expected type; ignored"
        );
    }
}

impl Visit for ViewConfigVisitor<'_> {
    /// `export const config = { ... }`
    fn visit_export_decl(&mut self, export: &ExportDecl) {
        if let Decl::Var(var_decl) = &export.decl {
            for declarator in &var_decl.decls {
                let Pat::Ident(BindingIdent { id, .. }) = &declarator.name else {
                    continue;
                };
                if id.sym.to_string() != "config" {
                    continue;
                }
                match declarator.init.as_deref().map(unwrap_ts_expr) {
                    Some(Expr::Object(obj_lit)) => self.read_config_object(obj_lit),
                    _ => tracing::warn!(
                        path = %self.path.display(),
                        "exported config is not an object literal; ignored"
                    ),
                }
            }
        }
        export.visit_children_with(self);
    }

    /// `export default function ProfileView() { ... }`
    fn visit_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        let ident = match &export.decl {
            DefaultDecl::Fn(FnExpr { ident, .. }) => ident.as_ref(),
            DefaultDecl::Class(ClassExpr { ident, .. }) => ident.as_ref(),
            _ => None,
        };
        if let Some(ident) = ident {
            self.module.component_name = Some(ident.sym.to_string());
        }
        export.visit_children_with(self);
    }

    /// `export default ProfileView;`
    fn visit_export_default_expr(&mut self, export: &ExportDefaultExpr) {
        if let Expr::Ident(ident) = unwrap_ts_expr(&export.expr) {
            self.module.component_name = Some(ident.sym.to_string());
        }
        export.visit_children_with(self);
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(Str { value, .. }) => Some(value.to_string()),
        _ => None,
    }
}

/// Strips parentheses and TypeScript-only wrappers (`as`, `satisfies`,
/// `as const`) around an expression.
fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(ParenExpr { expr, .. })
        | Expr::TsAs(TsAsExpr { expr, .. })
        | Expr::TsSatisfies(TsSatisfiesExpr { expr, .. })
        | Expr::TsConstAssertion(TsConstAssertion { expr, .. }) => unwrap_ts_expr(expr),
        other => other,
    }
}

fn string_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(Str { value, .. })) => Some(value.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() && tpl.quasis.len() == 1 => {
            tpl.quasis[0].cooked.as_ref().map(|cooked| cooked.to_string())
        }
        _ => None,
    }
}

fn bool_value(expr: &Expr) -> Option<bool> {
    match expr {
        Expr::Lit(Lit::Bool(Bool { value, .. })) => Some(*value),
        _ => None,
    }
}

fn string_array(expr: &Expr) -> Option<Vec<String>> {
    let Expr::Array(arr_lit) = expr else {
        return None;
    };
    arr_lit
        .elems
        .iter()
        .map(|elem| match elem {
            Some(ExprOrSpread { spread: None, expr }) => string_value(unwrap_ts_expr(expr)),
            _ => None,
        })
        .collect()
}

/// Parses view module source. `path` is used for the source map and
/// diagnostics only; its extension selects TSX or plain TypeScript syntax.
pub fn parse_view_source(path: &Path, src: String) -> Result<ViewModule> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Real(path.to_path_buf()), src);

    let tsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(true, |ext| ext == "tsx" || ext == "jsx" || ext == "js");

    let syntax = Syntax::Typescript(TsConfig {
        tsx,
        decorators: true,
        dts: false,
        no_early_errors: true,
        disallow_ambiguous_jsx_like: false,
    });

    let lexer = Lexer::new(syntax, Default::default(), StringInput::from(&*fm), None);
    let mut parser = SwcParser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| ViewsError::Parse {
        path: path.to_path_buf(),
        message: format!("{:?}", e),
    })?;

    let mut visitor = ViewConfigVisitor::new(path);
    visitor.visit_module(&module);

    tracing::debug!(
        path = %path.display(),
        title = ?visitor.module.config.title,
        component = ?visitor.module.component_name,
        "parsed view module"
    );

    Ok(visitor.module)
}

pub fn parse_view_file(path: &Path) -> Result<ViewModule> {
    let src = fs::read_to_string(path).map_err(|e| ViewsError::io(path, e))?;
    parse_view_source(path, src)
}
