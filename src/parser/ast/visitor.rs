use super::*;

/// Read-only AST traversal. Override the hooks you care about and call the
/// matching `walk_*` function to continue into children.
pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_class_member(&mut self, member: &'ast ClassMember) {
        walk_class_member(self, member);
    }

    fn visit_param(&mut self, param: &'ast Param) {
        walk_param(self, param);
    }

    fn visit_arg(&mut self, arg: &'ast Arg) {
        walk_arg(self, arg);
    }

    fn visit_array_item(&mut self, item: &'ast ArrayItem) {
        walk_array_item(self, item);
    }

    fn visit_match_arm(&mut self, arm: &'ast MatchArm) {
        walk_match_arm(self, arm);
    }

    fn visit_attribute_group(&mut self, group: &'ast AttributeGroup) {
        walk_attribute_group(self, group);
    }
}

pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, program: &'ast Program) {
    for stmt in &program.statements {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmts<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmts: &'ast [Stmt]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_opt_stmts<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmts: &'ast Option<Vec<Stmt>>) {
    if let Some(stmts) = stmts {
        walk_stmts(v, stmts);
    }
}

fn walk_exprs<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, exprs: &'ast [Expr]) {
    for expr in exprs {
        v.visit_expr(expr);
    }
}

fn walk_opt_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Option<Expr>) {
    if let Some(expr) = expr {
        v.visit_expr(expr);
    }
}

fn walk_opt_boxed_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Option<Box<Expr>>) {
    if let Some(expr) = expr {
        v.visit_expr(expr);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Echo { exprs, .. } => walk_exprs(v, exprs),
        Stmt::Return { expr, .. } => walk_opt_expr(v, expr),
        Stmt::If {
            condition,
            then_block,
            else_block,
            ..
        } => {
            v.visit_expr(condition);
            walk_stmts(v, then_block);
            walk_opt_stmts(v, else_block);
        }
        Stmt::While {
            condition, body, ..
        } => {
            v.visit_expr(condition);
            walk_stmts(v, body);
        }
        Stmt::DoWhile {
            body, condition, ..
        } => {
            walk_stmts(v, body);
            v.visit_expr(condition);
        }
        Stmt::For {
            init,
            condition,
            loop_expr,
            body,
            ..
        } => {
            walk_exprs(v, init);
            walk_exprs(v, condition);
            walk_exprs(v, loop_expr);
            walk_stmts(v, body);
        }
        Stmt::Foreach {
            expr,
            key_var,
            value_var,
            body,
            ..
        } => {
            v.visit_expr(expr);
            walk_opt_expr(v, key_var);
            v.visit_expr(value_var);
            walk_stmts(v, body);
        }
        Stmt::Block { statements, .. } => walk_stmts(v, statements),
        Stmt::Function {
            attributes,
            params,
            body,
            ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for param in params {
                v.visit_param(param);
            }
            walk_stmts(v, body);
        }
        Stmt::Class {
            attributes,
            members,
            ..
        }
        | Stmt::Interface {
            attributes,
            members,
            ..
        }
        | Stmt::Trait {
            attributes,
            members,
            ..
        }
        | Stmt::Enum {
            attributes,
            members,
            ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for member in members {
                v.visit_class_member(member);
            }
        }
        Stmt::Namespace { body, .. } => walk_opt_stmts(v, body),
        Stmt::Use { .. } => {}
        Stmt::Switch {
            condition, cases, ..
        } => {
            v.visit_expr(condition);
            for case in cases {
                walk_opt_expr(v, &case.condition);
                walk_stmts(v, &case.body);
            }
        }
        Stmt::Try {
            body,
            catches,
            finally,
            ..
        } => {
            walk_stmts(v, body);
            for catch in catches {
                walk_stmts(v, &catch.body);
            }
            walk_opt_stmts(v, finally);
        }
        Stmt::Throw { expr, .. } => v.visit_expr(expr),
        Stmt::Const { consts, .. } => {
            for entry in consts {
                v.visit_expr(&entry.value);
            }
        }
        Stmt::Global { vars, .. } | Stmt::Unset { vars, .. } => walk_exprs(v, vars),
        Stmt::StaticVars { vars, .. } => {
            for var in vars {
                walk_opt_expr(v, &var.default);
            }
        }
        Stmt::Expression { expr, .. } => v.visit_expr(expr),
        Stmt::Declare { body, .. } => walk_stmts(v, body),
        Stmt::Break { .. }
        | Stmt::Continue { .. }
        | Stmt::Goto { .. }
        | Stmt::Label { .. }
        | Stmt::InlineHtml { .. }
        | Stmt::Nop { .. }
        | Stmt::Error { .. } => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Assign { var, expr, .. }
        | Expr::AssignRef { var, expr, .. }
        | Expr::AssignOp { var, expr, .. } => {
            v.visit_expr(var);
            v.visit_expr(expr);
        }
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Unary { expr, .. } => v.visit_expr(expr),
        Expr::Ternary {
            condition,
            if_true,
            if_false,
            ..
        } => {
            v.visit_expr(condition);
            walk_opt_boxed_expr(v, if_true);
            v.visit_expr(if_false);
        }
        Expr::Call { func, args, .. } => {
            v.visit_expr(func);
            for arg in args {
                v.visit_arg(arg);
            }
        }
        Expr::MethodCall {
            target,
            method,
            args,
            ..
        } => {
            v.visit_expr(target);
            v.visit_expr(method);
            for arg in args {
                v.visit_arg(arg);
            }
        }
        Expr::StaticCall {
            class,
            method,
            args,
            ..
        } => {
            v.visit_expr(class);
            v.visit_expr(method);
            for arg in args {
                v.visit_arg(arg);
            }
        }
        Expr::PropertyFetch {
            target, property, ..
        } => {
            v.visit_expr(target);
            v.visit_expr(property);
        }
        Expr::ClassConstFetch {
            class, constant, ..
        } => {
            v.visit_expr(class);
            v.visit_expr(constant);
        }
        Expr::ArrayDimFetch { array, dim, .. } => {
            v.visit_expr(array);
            walk_opt_boxed_expr(v, dim);
        }
        Expr::Array { items, .. } => {
            for item in items {
                v.visit_array_item(item);
            }
        }
        Expr::New { class, args, .. } => {
            v.visit_expr(class);
            for arg in args {
                v.visit_arg(arg);
            }
        }
        Expr::AnonymousClass {
            attributes,
            args,
            members,
            ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for arg in args {
                v.visit_arg(arg);
            }
            for member in members {
                v.visit_class_member(member);
            }
        }
        Expr::Closure {
            attributes,
            params,
            body,
            ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for param in params {
                v.visit_param(param);
            }
            walk_stmts(v, body);
        }
        Expr::ArrowFunction {
            attributes,
            params,
            expr,
            ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for param in params {
                v.visit_param(param);
            }
            v.visit_expr(expr);
        }
        Expr::IndirectVariable { name, .. } => v.visit_expr(name),
        Expr::Match {
            condition, arms, ..
        } => {
            v.visit_expr(condition);
            for arm in arms {
                v.visit_match_arm(arm);
            }
        }
        Expr::Cast { expr, .. }
        | Expr::Empty { expr, .. }
        | Expr::Eval { expr, .. }
        | Expr::Include { expr, .. }
        | Expr::Print { expr, .. }
        | Expr::Clone { expr, .. }
        | Expr::Throw { expr, .. } => v.visit_expr(expr),
        Expr::Isset { vars, .. } => walk_exprs(v, vars),
        Expr::Exit { expr, .. } => walk_opt_boxed_expr(v, expr),
        Expr::Yield { key, value, .. } => {
            walk_opt_boxed_expr(v, key);
            walk_opt_boxed_expr(v, value);
        }
        Expr::PostInc { var, .. } | Expr::PostDec { var, .. } => v.visit_expr(var),
        Expr::Variable { .. }
        | Expr::ConstFetch { .. }
        | Expr::Identifier { .. }
        | Expr::Integer { .. }
        | Expr::Float { .. }
        | Expr::Boolean { .. }
        | Expr::Null { .. }
        | Expr::String { .. }
        | Expr::MagicConst { .. }
        | Expr::VariadicPlaceholder { .. }
        | Expr::Error { .. } => {}
    }
}

pub fn walk_class_member<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, member: &'ast ClassMember) {
    match member {
        ClassMember::Property {
            attributes,
            entries,
            ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for entry in entries {
                walk_opt_expr(v, &entry.default);
            }
        }
        ClassMember::Method {
            attributes,
            params,
            body,
            ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for param in params {
                v.visit_param(param);
            }
            walk_opt_stmts(v, body);
        }
        ClassMember::Const {
            attributes, consts, ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            for entry in consts {
                v.visit_expr(&entry.value);
            }
        }
        ClassMember::TraitUse { .. } => {}
        ClassMember::Case {
            attributes, value, ..
        } => {
            for group in attributes {
                v.visit_attribute_group(group);
            }
            walk_opt_expr(v, value);
        }
    }
}

pub fn walk_param<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, param: &'ast Param) {
    for group in &param.attributes {
        v.visit_attribute_group(group);
    }
    walk_opt_expr(v, &param.default);
}

pub fn walk_arg<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, arg: &'ast Arg) {
    v.visit_expr(&arg.value);
}

pub fn walk_array_item<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, item: &'ast ArrayItem) {
    walk_opt_expr(v, &item.key);
    v.visit_expr(&item.value);
}

pub fn walk_match_arm<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, arm: &'ast MatchArm) {
    if let Some(conditions) = &arm.conditions {
        walk_exprs(v, conditions);
    }
    v.visit_expr(&arm.body);
}

pub fn walk_attribute_group<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, group: &'ast AttributeGroup) {
    for attribute in &group.attributes {
        for arg in &attribute.args {
            v.visit_arg(arg);
        }
    }
}
