//! Module tree of a library crate.
//!
//! Starting at the library root, every out-of-line `mod name;` is resolved
//! the way rustc does it:
//!
//! ```text
//! lib.rs, mod.rs, #[path] files   name.rs | name/mod.rs next to the file
//! other files (foo.rs)            foo/name.rs | foo/name/mod.rs
//! inline `mod a { mod b; }`       b is looked up below `a/`
//! #[path = "p"]                   relative to the file's directory
//! ```
//!
//! Files no `mod` item reaches (binaries, examples, orphans) are not part
//! of the tree.

use std::fs;
use std::path::{Path, PathBuf};

use syn::ext::IdentExt;
use syn::{Attribute, Expr, ExprLit, Item, ItemMod, Lit, Meta};

/// A source file of the module tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Size in bytes.
    pub len: u64,
}

/// Files reached from `root`, root first, in declaration order.
///
/// The error is a one-line message (`could not parse ...`).
pub fn module_files(root: &Path) -> Result<Vec<SourceFile>, String> {
    let mut files = Vec::new();
    let module_dir = parent_dir(root).to_path_buf();
    visit_file(root, &module_dir, &mut files)?;
    Ok(files)
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new(""))
}

fn visit_file(path: &Path, module_dir: &Path, files: &mut Vec<SourceFile>) -> Result<(), String> {
    // `#[path]` can point back into the tree
    if files.iter().any(|f| f.path == path) {
        return Ok(());
    }

    let code = fs::read_to_string(path)
        .map_err(|e| format!("could not read `{}`: {e}", path.display()))?;
    let file =
        syn::parse_file(&code).map_err(|e| format!("could not parse `{}`: {e}", path.display()))?;

    files.push(SourceFile {
        path: path.to_path_buf(),
        len: code.len() as u64,
    });

    let scope = Scope {
        file_dir: parent_dir(path),
        module_dir,
        inline: false,
    };
    visit_items(&file.items, &scope, files)
}

/// Where `mod` items of the current item list are looked up.
struct Scope<'a> {
    /// Directory of the file being read.
    file_dir: &'a Path,
    /// Directory child modules live in.
    module_dir: &'a Path,
    /// Inside an inline `mod { ... }` block.
    inline: bool,
}

fn visit_items(items: &[Item], scope: &Scope, files: &mut Vec<SourceFile>) -> Result<(), String> {
    for item in items {
        let Item::Mod(ItemMod {
            attrs,
            ident,
            content,
            ..
        }) = item
        else {
            continue;
        };
        let name = ident.unraw().to_string();
        let path_attr = path_attribute(attrs);

        match content {
            Some((_, nested)) => {
                let dir = scope.module_dir.join(path_attr.as_deref().unwrap_or(name.as_str()));
                let inner = Scope {
                    file_dir: scope.file_dir,
                    module_dir: &dir,
                    inline: true,
                };
                visit_items(nested, &inner, files)?;
            }
            None => {
                let (found, child_dir) = resolve_module(&name, path_attr.as_deref(), scope)?;
                visit_file(&found, &child_dir, files)?;
            }
        }
    }
    Ok(())
}

/// File of the out-of-line module `name`, and the directory of its children.
fn resolve_module(
    name: &str,
    path_attr: Option<&str>,
    scope: &Scope,
) -> Result<(PathBuf, PathBuf), String> {
    if let Some(path) = path_attr {
        let base = if scope.inline {
            scope.module_dir
        } else {
            scope.file_dir
        };
        let file = base.join(path);
        if !file.is_file() {
            return Err(format!("module `{name}`: `{}` does not exist", file.display()));
        }
        let child_dir = parent_dir(&file).to_path_buf();
        return Ok((file, child_dir));
    }

    let flat = scope.module_dir.join(format!("{name}.rs"));
    if flat.is_file() {
        return Ok((flat, scope.module_dir.join(name)));
    }
    let nested = scope.module_dir.join(name).join("mod.rs");
    if nested.is_file() {
        return Ok((nested, scope.module_dir.join(name)));
    }
    Err(format!(
        "module `{name}`: neither `{}` nor `{}` exists",
        flat.display(),
        nested.display()
    ))
}

/// Value of a `#[path = "..."]` attribute.
fn path_attribute(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("path") => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value()),
            _ => None,
        },
        _ => None,
    })
}
