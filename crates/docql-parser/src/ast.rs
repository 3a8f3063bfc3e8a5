//! The typed abstract syntax tree.
//!
//! Node variants mirror the canonical s-expression vocabulary (`lit`, `id`,
//! `@`, `path`, `call`, `cast`, `select`, …); [`Expr::to_sexp`] renders any
//! tree into the document model, which keeps parser output printable and
//! directly comparable in tests.

use docql_value::Value;

use crate::types::TypeName;

/// One component of a path expression.
#[derive(Debug, Clone)]
pub enum PathComponent {
    /// `e.ident` — equivalent to indexing with the field name.
    Field(String),
    /// `e[expr]`
    Index(Expr),
    /// `e[*]`
    Wildcard,
    /// `e.*`
    UnpivotWildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
}

impl UnaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    In,
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Concat => "||",
            BinaryOp::In => "in",
        }
    }
}

/// The projection of a SELECT.
#[derive(Debug, Clone)]
pub enum Projection {
    /// `SELECT *`
    Star,
    List(Vec<SelectItem>),
}

#[derive(Debug, Clone)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// How a FROM source is iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FromKind {
    /// Ordinary iteration over the source's elements.
    Scan,
    /// `UNPIVOT expr`: iterate struct fields as named values.
    Unpivot,
}

#[derive(Debug, Clone)]
pub struct FromSource {
    pub kind: FromKind,
    pub expr: Expr,
    pub as_alias: Option<String>,
    pub at_alias: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderKey {
    pub expr: Expr,
    pub descending: bool,
}

#[derive(Debug, Clone)]
pub struct Select {
    pub projection: Projection,
    pub from: Vec<FromSource>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderKey>,
    pub limit: Option<Expr>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal document value.
    Lit(Value),
    /// A lexically-resolved name.
    Id(String),
    /// `@name`: resolves in the innermost scope only.
    LocalId(String),
    Path(Box<Expr>, Vec<PathComponent>),
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Like {
        value: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
    },
    Between {
        value: Box<Expr>,
        lower: Box<Expr>,
        upper: Box<Expr>,
    },
    IsType {
        value: Box<Expr>,
        type_name: TypeName,
    },
    Cast {
        value: Box<Expr>,
        type_name: TypeName,
    },
    Case {
        /// Present for the simple form, absent for the searched form.
        operand: Option<Box<Expr>>,
        whens: Vec<(Expr, Expr)>,
        otherwise: Option<Box<Expr>>,
    },
    /// `{name_expr: value_expr, …}`
    Struct(Vec<(Expr, Expr)>),
    /// `[e, …]`
    List(Vec<Expr>),
    /// `VALUES (…), (…)`
    Values(Vec<Vec<Expr>>),
    Select(Box<Select>),
}

impl Expr {
    /// Render the tree as an s-expression in the document model.
    pub fn to_sexp(&self) -> Value {
        match self {
            Expr::Lit(value) => node("lit", vec![value.clone()]),
            Expr::Id(name) => node("id", vec![Value::symbol(name.clone())]),
            Expr::LocalId(name) => node(
                "@",
                vec![node("id", vec![Value::symbol(name.clone())])],
            ),
            Expr::Path(root, components) => {
                let mut items = vec![root.to_sexp()];
                items.extend(components.iter().map(PathComponent::to_sexp));
                node("path", items)
            }
            Expr::Call { name, args } => {
                let mut items = vec![Value::symbol(name.clone())];
                items.extend(args.iter().map(Expr::to_sexp));
                node("call", items)
            }
            Expr::Unary(op, operand) => node(op.name(), vec![operand.to_sexp()]),
            Expr::Binary(op, left, right) => {
                node(op.name(), vec![left.to_sexp(), right.to_sexp()])
            }
            Expr::Like {
                value,
                pattern,
                escape,
            } => {
                let mut items = vec![value.to_sexp(), pattern.to_sexp()];
                if let Some(escape) = escape {
                    items.push(escape.to_sexp());
                }
                node("like", items)
            }
            Expr::Between {
                value,
                lower,
                upper,
            } => node(
                "between",
                vec![value.to_sexp(), lower.to_sexp(), upper.to_sexp()],
            ),
            Expr::IsType { value, type_name } => {
                node("is", vec![value.to_sexp(), type_name.to_sexp()])
            }
            Expr::Cast { value, type_name } => {
                node("cast", vec![value.to_sexp(), type_name.to_sexp()])
            }
            Expr::Case {
                operand,
                whens,
                otherwise,
            } => {
                let mut items = Vec::new();
                if let Some(operand) = operand {
                    items.push(operand.to_sexp());
                }
                for (condition, result) in whens {
                    items.push(node("when", vec![condition.to_sexp(), result.to_sexp()]));
                }
                if let Some(otherwise) = otherwise {
                    items.push(node("else", vec![otherwise.to_sexp()]));
                }
                node("case", items)
            }
            Expr::Struct(fields) => {
                let items = fields
                    .iter()
                    .map(|(name, value)| Value::sexp(vec![name.to_sexp(), value.to_sexp()]))
                    .collect();
                node("struct", items)
            }
            Expr::List(items) => node("list", items.iter().map(Expr::to_sexp).collect()),
            Expr::Values(rows) => {
                let items = rows
                    .iter()
                    .map(|row| node("list", row.iter().map(Expr::to_sexp).collect()))
                    .collect();
                node("values", items)
            }
            Expr::Select(select) => select.to_sexp(),
        }
    }
}

impl PathComponent {
    fn to_sexp(&self) -> Value {
        match self {
            PathComponent::Field(name) => node("lit", vec![Value::string(name.clone())]),
            PathComponent::Index(expr) => expr.to_sexp(),
            PathComponent::Wildcard => node("wildcard", vec![]),
            PathComponent::UnpivotWildcard => node("unpivot_wildcard", vec![]),
        }
    }
}

impl Select {
    fn to_sexp(&self) -> Value {
        let mut items = Vec::new();

        let projection = match &self.projection {
            Projection::Star => node("star", vec![]),
            Projection::List(list) => {
                let columns = list
                    .iter()
                    .map(|item| match &item.alias {
                        Some(alias) => node(
                            "as",
                            vec![Value::symbol(alias.clone()), item.expr.to_sexp()],
                        ),
                        None => item.expr.to_sexp(),
                    })
                    .collect();
                node("list", columns)
            }
        };
        items.push(node("project", vec![projection]));

        let sources = self.from.iter().map(FromSource::to_sexp).collect();
        items.push(node("from", sources));

        if let Some(where_clause) = &self.where_clause {
            items.push(node("where", vec![where_clause.to_sexp()]));
        }
        if !self.group_by.is_empty() {
            items.push(node(
                "group_by",
                self.group_by.iter().map(Expr::to_sexp).collect(),
            ));
        }
        if let Some(having) = &self.having {
            items.push(node("having", vec![having.to_sexp()]));
        }
        if !self.order_by.is_empty() {
            let keys = self
                .order_by
                .iter()
                .map(|key| {
                    let direction = if key.descending { "desc" } else { "asc" };
                    node(direction, vec![key.expr.to_sexp()])
                })
                .collect();
            items.push(node("order_by", keys));
        }
        if let Some(limit) = &self.limit {
            items.push(node("limit", vec![limit.to_sexp()]));
        }

        node("select", items)
    }
}

impl FromSource {
    fn to_sexp(&self) -> Value {
        let mut source = self.expr.to_sexp();
        if self.kind == FromKind::Unpivot {
            source = node("unpivot", vec![source]);
        }
        if let Some(alias) = &self.as_alias {
            source = node("as", vec![Value::symbol(alias.clone()), source]);
        }
        if let Some(alias) = &self.at_alias {
            source = node("at", vec![Value::symbol(alias.clone()), source]);
        }
        source
    }
}

fn node(name: &str, mut args: Vec<Value>) -> Value {
    let mut items = vec![Value::symbol(name)];
    items.append(&mut args);
    Value::sexp(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_and_ids_render() {
        assert_eq!(Expr::Lit(Value::int(5)).to_sexp().to_string(), "(lit 5)");
        assert_eq!(Expr::Id("a".into()).to_sexp().to_string(), "(id a)");
        assert_eq!(
            Expr::LocalId("a".into()).to_sexp().to_string(),
            "(@ (id a))"
        );
    }

    #[test]
    fn binary_ops_render_with_canonical_names() {
        let e = Expr::Binary(
            BinaryOp::Ne,
            Box::new(Expr::Id("a".into())),
            Box::new(Expr::Lit(Value::int(1))),
        );
        assert_eq!(e.to_sexp().to_string(), "(<> (id a) (lit 1))");
    }

    #[test]
    fn path_renders_components() {
        let e = Expr::Path(
            Box::new(Expr::Id("a".into())),
            vec![
                PathComponent::Field("b".into()),
                PathComponent::Index(Expr::Lit(Value::int(0))),
                PathComponent::Wildcard,
            ],
        );
        assert_eq!(
            e.to_sexp().to_string(),
            "(path (id a) (lit \"b\") (lit 0) (wildcard))"
        );
    }
}
