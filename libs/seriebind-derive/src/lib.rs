use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive macro for record destinations/sources of the binding engine.
///
/// Generates `seriebind::Record` (cached descriptor table, indexed field
/// bind/read) and `seriebind::Bind` (delegating to `bind_record`) for a
/// struct with named fields.
///
/// Field annotation — the engine's metadata contract, one string literal:
/// explicit source name first (empty = snake-case convention), optional
/// trailing `tag`, `time`, or `ignore` marker; `-` alone ignores the field.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// #[series(measurement = "cpu_load")]
/// pub struct CpuLoad {
///     #[series(",time")]
///     pub time: DateTime<Utc>,
///
///     #[series("host,tag")]
///     pub host: String,
///
///     pub load: f64,
///
///     #[series("-")]
///     pub scratch: bool,
/// }
/// ```
///
/// Non-ignored field types must implement `seriebind::Bind` and
/// `seriebind::ToValue`; ignored fields only need `Default`.
#[proc_macro_derive(Record, attributes(series))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    // Container attribute: #[series(measurement = "...")].
    let mut measurement: Option<String> = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("series") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("measurement") {
                let value: LitStr = meta.value()?.parse()?;
                measurement = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unknown series attribute (expected 'measurement')"))
            }
        })?;
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(name, "Record only supports structs"));
        }
    };

    let mut descriptor_tokens = Vec::new();
    let mut bind_arms = Vec::new();
    let mut value_arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name = ident.to_string();

        // Field attribute: #[series("...")]. Absent means convention.
        let mut annotation = String::new();
        for attr in &field.attrs {
            if !attr.path().is_ident("series") {
                continue;
            }
            let lit: LitStr = attr.parse_args()?;
            annotation = lit.value();
        }

        descriptor_tokens.push(quote! {
            seriebind::FieldDescriptor::parse(#field_name, #annotation)
        });

        // Ignored fields get inert arms so they need neither Bind nor
        // ToValue; the engine never touches them. Full annotation parsing
        // stays in seriebind::meta.
        if annotation == "-" || annotation.ends_with(",ignore") {
            bind_arms.push(quote! { #index => Ok(()), });
            value_arms.push(quote! { #index => seriebind::Value::Null, });
        } else {
            bind_arms.push(quote! {
                #index => seriebind::Bind::bind(&mut self.#ident, ctx),
            });
            value_arms.push(quote! {
                #index => seriebind::ToValue::to_value(&self.#ident),
            });
        }
    }

    let measurement_impl = match measurement {
        Some(m) => quote! {
            fn measurement(&self) -> String {
                #m.to_string()
            }
        },
        None => quote! {},
    };

    let expanded = quote! {
        impl seriebind::Record for #name {
            fn descriptors() -> &'static [seriebind::FieldDescriptor] {
                static DESCRIPTORS: std::sync::OnceLock<Vec<seriebind::FieldDescriptor>> =
                    std::sync::OnceLock::new();
                DESCRIPTORS.get_or_init(|| vec![
                    #(#descriptor_tokens),*
                ])
            }

            fn bind_field(
                &mut self,
                index: usize,
                ctx: &seriebind::RowContext<'_>,
            ) -> Result<(), seriebind::BindError> {
                match index {
                    #(#bind_arms)*
                    _ => Err(seriebind::BindError::NotAssignable("field index out of range")),
                }
            }

            fn field_value(&self, index: usize) -> seriebind::Value {
                match index {
                    #(#value_arms)*
                    _ => seriebind::Value::Null,
                }
            }

            #measurement_impl
        }

        impl seriebind::Bind for #name {
            fn bind(
                &mut self,
                ctx: &seriebind::RowContext<'_>,
            ) -> Result<(), seriebind::BindError> {
                seriebind::bind_record(self, ctx)
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
