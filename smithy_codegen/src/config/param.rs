//! Standard config parameters: a field, a getter and a pair of setters.

use std::sync::Arc;

use heck::{ToSnakeCase, ToUpperCamelCase};

use super::{ServiceConfig, docs_or_fallback};
use crate::context::CodegenContext;
use crate::customize::{Customization, SharedCustomization};
use crate::error::{CodegenError, CodegenResult};
use crate::rustlang::{
    CargoDependency, DependencyLocation, InlineDependency, RuntimeType, RustModule, Writable, writable,
};
use crate::settings::{ConfigParamSettings, RuntimeConfig, StorageMode};

/// Version requirement used when a declared parameter's crate has none.
const ANY_VERSION: &str = "*";

/// A config parameter exposed on the generated `Config` and its builder.
#[derive(Clone, Debug)]
pub struct ConfigParam {
    /// Field and setter name, in snake case.
    pub name: String,
    /// Parameter type.
    pub ty: RuntimeType,
    /// Wrapper stored in the layered bag; required in layered-bag mode.
    pub newtype: Option<RuntimeType>,
    /// Documentation for the setters.
    pub setter_docs: Option<String>,
    /// Documentation for the getter or field.
    pub getter_docs: Option<String>,
    /// Whether the config exposes the value as an `Option`.
    pub optional: bool,
}

impl ConfigParam {
    /// An optional parameter without docs or newtype.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: RuntimeType) -> Self {
        Self {
            name: name.into(),
            ty,
            newtype: None,
            setter_docs: None,
            getter_docs: None,
            optional: true,
        }
    }

    /// Sets the layered-bag wrapper.
    #[must_use]
    pub fn with_newtype(self, newtype: RuntimeType) -> Self {
        Self {
            newtype: Some(newtype),
            ..self
        }
    }

    /// Sets the setter documentation.
    #[must_use]
    pub fn with_setter_docs(self, docs: impl Into<String>) -> Self {
        Self {
            setter_docs: Some(docs.into()),
            ..self
        }
    }

    /// Sets the getter documentation.
    #[must_use]
    pub fn with_getter_docs(self, docs: impl Into<String>) -> Self {
        Self {
            getter_docs: Some(docs.into()),
            ..self
        }
    }

    /// Exposes the value directly instead of as an `Option`.
    #[must_use]
    pub fn required(self) -> Self {
        Self {
            optional: false,
            ..self
        }
    }

    /// Whether the bag accessor copies the value instead of cloning it.
    #[must_use]
    pub fn is_copy(&self) -> bool {
        self.ty.path() == "bool"
    }

    /// Builds a parameter declared in the settings, with a
    /// `<Name>Param` newtype in the config module.
    #[must_use]
    pub fn from_settings(declared: &ConfigParamSettings, config: &RuntimeConfig) -> Self {
        let ty = match &declared.crate_name {
            Some(crate_name) => {
                let version = declared.version.as_deref().unwrap_or(ANY_VERSION);
                let dependency = CargoDependency::new(crate_name.clone(), DependencyLocation::crates_io(version));
                RuntimeType::new(
                    format!("::{}", declared.type_path.trim_start_matches("::")),
                    Some(dependency.into()),
                )
            }
            None => RuntimeType::primitive(declared.type_path.clone()),
        };
        let newtype_name = format!("{}Param", declared.name.to_upper_camel_case());
        let newtype = config_param_newtype(&newtype_name, &ty, config);
        Self {
            name: declared.name.to_snake_case(),
            newtype: Some(newtype),
            setter_docs: declared.docs.clone(),
            getter_docs: declared.docs.clone(),
            ..Self::new(String::new(), ty)
        }
    }
}

/// Declares `pub(crate) struct <name>(<inner>)` in the config module, storable
/// in the layered bag, and returns its type.
#[must_use]
pub fn config_param_newtype(name: &str, inner: &RuntimeType, config: &RuntimeConfig) -> RuntimeType {
    let config_bag = RuntimeType::smithy_types(config).resolve("config_bag");
    let storable = config_bag.resolve("Storable");
    let store_replace = config_bag.resolve("StoreReplace");
    let wrapped = inner.clone();
    let newtype = name.to_owned();
    InlineDependency::new(name, RustModule::config(), Vec::new(), move |w| {
        w.rust_template(
            r"
            ##[derive(Debug, Clone)]
            pub(crate) struct #{newtype}(pub(crate) #{inner});
            impl #{Storable} for #{newtype} {
                type Storer = #{StoreReplace}<Self>;
            }
            ",
            &[
                ("newtype", newtype.as_str().into()),
                ("inner", (&wrapped).into()),
                ("Storable", (&storable).into()),
                ("StoreReplace", (&store_replace).into()),
            ],
        );
    })
    .to_type()
}

enum Storage {
    Fields,
    Bag { newtype: RuntimeType },
}

/// Customization emitting a [`ConfigParam`] in either storage mode.
pub struct StandardConfigParam {
    param: ConfigParam,
    storage: Storage,
}

impl StandardConfigParam {
    /// Creates the customization for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::MissingNewtype`] in layered-bag mode when the
    /// parameter has no newtype.
    pub fn new(param: ConfigParam, mode: StorageMode) -> CodegenResult<Self> {
        let storage = match (mode, &param.newtype) {
            (StorageMode::DirectFields, _) => Storage::Fields,
            (StorageMode::LayeredBag, Some(newtype)) => Storage::Bag {
                newtype: newtype.clone(),
            },
            (StorageMode::LayeredBag, None) => {
                return Err(CodegenError::MissingNewtype {
                    param: param.name.clone(),
                });
            }
        };
        Ok(Self { param, storage })
    }

    /// The parameter.
    #[must_use]
    pub const fn param(&self) -> &ConfigParam {
        &self.param
    }

    fn accessor(&self) -> &'static str {
        if self.param.is_copy() {
            "|ty| ty.0"
        } else {
            "|ty| ty.0.clone()"
        }
    }

    fn setters(&self) -> Writable<'_> {
        let param = &self.param;
        writable(move |w| {
            let store = match &self.storage {
                Storage::Fields => writable(move |out| {
                    out.rust_template("self.#{name} = #{name};", &[("name", param.name.as_str().into())]);
                }),
                Storage::Bag { newtype } => writable(move |out| {
                    out.rust_template(
                        "self.inner.store_or_unset(#{name}.map(#{newtype}));",
                        &[("name", param.name.as_str().into()), ("newtype", newtype.into())],
                    );
                }),
            };
            docs_or_fallback(w, param.setter_docs.as_deref());
            w.rust_template(
                r"
                pub fn #{name}(mut self, #{name}: impl Into<#{ty}>) -> Self {
                    self.set_#{name}(Some(#{name}.into()));
                    self
                }
                ",
                &[("name", param.name.as_str().into()), ("ty", (&param.ty).into())],
            );
            w.blank_line();
            docs_or_fallback(w, param.setter_docs.as_deref());
            w.rust_template(
                r"
                pub fn set_#{name}(&mut self, #{name}: Option<#{ty}>) -> &mut Self {
                    #{store}
                    self
                }
                ",
                &[
                    ("name", param.name.as_str().into()),
                    ("ty", (&param.ty).into()),
                    ("store", store.into()),
                ],
            );
        })
    }
}

impl Customization<ServiceConfig> for StandardConfigParam {
    fn name(&self) -> &str {
        &self.param.name
    }

    fn section(&self, section: &ServiceConfig) -> Writable<'_> {
        let param = &self.param;
        match (section, &self.storage) {
            (ServiceConfig::ConfigStruct, Storage::Fields) => writable(move |w| {
                docs_or_fallback(w, param.getter_docs.as_deref());
                let template = if param.optional {
                    "pub(crate) #{name}: Option<#{ty}>,"
                } else {
                    "pub(crate) #{name}: #{ty},"
                };
                w.rust_template(
                    template,
                    &[("name", param.name.as_str().into()), ("ty", (&param.ty).into())],
                );
            }),
            (ServiceConfig::ConfigImpl, Storage::Bag { newtype }) => writable(move |w| {
                docs_or_fallback(w, param.getter_docs.as_deref());
                let template = if param.optional {
                    r"
                    pub fn #{name}(&self) -> Option<#{ty}> {
                        self.inner.load::<#{newtype}>().map(#{f})
                    }
                    "
                } else {
                    r"
                    pub fn #{name}(&self) -> #{ty} {
                        self.inner.load::<#{newtype}>().map(#{f}).unwrap_or_default()
                    }
                    "
                };
                w.rust_template(
                    template,
                    &[
                        ("name", param.name.as_str().into()),
                        ("ty", (&param.ty).into()),
                        ("newtype", newtype.into()),
                        ("f", self.accessor().into()),
                    ],
                );
            }),
            (ServiceConfig::BuilderStruct, Storage::Fields) => writable(move |w| {
                w.rust_template(
                    "#{name}: Option<#{ty}>,",
                    &[("name", param.name.as_str().into()), ("ty", (&param.ty).into())],
                );
            }),
            (ServiceConfig::BuilderImpl, _) => self.setters(),
            (ServiceConfig::BuilderBuild, Storage::Fields) => writable(move |w| {
                let value = if param.optional {
                    format!("self.{}", param.name)
                } else {
                    format!("self.{}.unwrap_or_default()", param.name)
                };
                w.rust_template(
                    "#{name}: #{value},",
                    &[("name", param.name.as_str().into()), ("value", value.into())],
                );
            }),
            _ => Writable::empty(),
        }
    }
}

/// Shares a [`StandardConfigParam`] for the context's storage mode.
///
/// # Errors
///
/// Returns [`CodegenError::MissingNewtype`] in layered-bag mode when the
/// parameter has no newtype.
pub fn standard_config_param(
    param: ConfigParam,
    ctx: &CodegenContext<'_>,
) -> CodegenResult<SharedCustomization<ServiceConfig>> {
    Ok(Arc::new(StandardConfigParam::new(param, ctx.storage_mode())?))
}
