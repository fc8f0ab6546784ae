//! 组件声明宏实现

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Expr, Ident,
    ItemStruct, Lit, Meta, Path, Result, Token,
};

/// 组件生命周期参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentLifetime {
    Singleton,
    Scoped,
    Transient,
}

impl ComponentLifetime {
    fn variant(self) -> proc_macro2::TokenStream {
        match self {
            ComponentLifetime::Singleton => quote! { sentry_common::Lifetime::Singleton },
            ComponentLifetime::Scoped => quote! { sentry_common::Lifetime::Scoped },
            ComponentLifetime::Transient => quote! { sentry_common::Lifetime::Transient },
        }
    }

    fn marker_trait(self) -> Ident {
        let name = match self {
            ComponentLifetime::Singleton => "Singleton",
            ComponentLifetime::Scoped => "Scoped",
            ComponentLifetime::Transient => "Transient",
        };
        Ident::new(name, Span::call_site())
    }
}

/// 组件宏参数
#[derive(Debug, Clone)]
pub struct ComponentArgs {
    /// 生命周期标记
    pub lifetime: ComponentLifetime,
    /// 暴露的接口集合
    pub provides: Vec<Path>,
    /// 自定义组件名称
    pub name: Option<String>,
    /// 组件优先级
    pub priority: i32,
    /// 是否启用
    pub enabled: bool,
}

impl Default for ComponentArgs {
    fn default() -> Self {
        Self {
            lifetime: ComponentLifetime::Singleton,
            provides: Vec::new(),
            name: None,
            priority: 0,
            enabled: true,
        }
    }
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = ComponentArgs::default();
        let mut lifetimes: Vec<ComponentLifetime> = Vec::new();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match meta {
                Meta::Path(path) => {
                    if path.is_ident("singleton") {
                        lifetimes.push(ComponentLifetime::Singleton);
                    } else if path.is_ident("scoped") {
                        lifetimes.push(ComponentLifetime::Scoped);
                    } else if path.is_ident("transient") {
                        lifetimes.push(ComponentLifetime::Transient);
                    } else if path.is_ident("enabled") {
                        args.enabled = true;
                    } else if path.is_ident("disabled") {
                        args.enabled = false;
                    } else {
                        return Err(syn::Error::new_spanned(path, "未知的组件参数"));
                    }
                }
                Meta::List(list) => {
                    if list.path.is_ident("provides") {
                        let interfaces = list
                            .parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
                        args.provides.extend(interfaces);
                    } else {
                        return Err(syn::Error::new_spanned(list.path, "未知的组件参数"));
                    }
                }
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("priority") {
                        if let Expr::Lit(expr_lit) = nv.value {
                            if let Lit::Int(lit_int) = expr_lit.lit {
                                args.priority = lit_int.base10_parse()?;
                            }
                        }
                    } else if nv.path.is_ident("name") {
                        if let Expr::Lit(expr_lit) = nv.value {
                            if let Lit::Str(lit_str) = expr_lit.lit {
                                args.name = Some(lit_str.value());
                            }
                        }
                    } else {
                        return Err(syn::Error::new_spanned(nv.path, "未知的组件参数"));
                    }
                }
            }
        }

        // 多个生命周期标记会造成不确定的注册意图，拒绝而不是静默取第一个
        if lifetimes.len() > 1 {
            return Err(syn::Error::new(
                Span::call_site(),
                "组件最多只能声明一个生命周期标记",
            ));
        }
        if let Some(lifetime) = lifetimes.first() {
            args.lifetime = *lifetime;
        }

        Ok(args)
    }
}

/// 实现 #[component] 宏
pub fn component_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let component_args = match syn::parse::<ComponentArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };

    let input_struct = parse_macro_input!(input as ItemStruct);

    // 开放泛型定义无法注册为具体组件
    if !input_struct.generics.params.is_empty() {
        return syn::Error::new_spanned(&input_struct.generics, "组件不支持泛型参数")
            .to_compile_error()
            .into();
    }

    let struct_name = &input_struct.ident;
    let struct_name_string = struct_name.to_string();
    let component_name = component_args
        .name
        .clone()
        .unwrap_or(struct_name_string.clone());

    let lifetime_variant = component_args.lifetime.variant();
    let marker_trait = component_args.lifetime.marker_trait();
    let priority = component_args.priority;
    let enabled = component_args.enabled;

    let bindings = component_args.provides.iter().map(|interface| {
        quote! {
            sentry_di::InterfaceBinding {
                interface: sentry_di::TypeKey::of::<dyn #interface>(),
                adapt: std::sync::Arc::new(|shared: sentry_di::SharedInstance| {
                    let concrete = shared.downcast::<#struct_name>().map_err(|_| {
                        sentry_common::DependencyError::TypeMismatch {
                            type_name: std::any::type_name::<#struct_name>().to_string(),
                        }
                    })?;
                    let service: std::sync::Arc<dyn #interface> = concrete;
                    Ok(Box::new(service) as sentry_di::SharedService)
                }),
            }
        }
    });

    let registration_fn_name = Ident::new(
        &format!("__sentry_register_{}", struct_name_string.to_lowercase()),
        Span::call_site(),
    );

    let expanded = quote! {
        #input_struct

        impl sentry_common::Component for #struct_name {
            fn name(&self) -> &'static str {
                #component_name
            }

            fn priority(&self) -> i32 {
                #priority
            }

            fn is_enabled(&self) -> bool {
                #enabled
            }
        }

        impl sentry_common::LifecycleMarker for #struct_name {}
        impl sentry_common::#marker_trait for #struct_name {}

        impl sentry_di::Discoverable for #struct_name {
            fn candidate() -> sentry_di::CandidateComponent {
                sentry_di::CandidateComponent {
                    type_info: sentry_common::TypeInfo::of::<#struct_name>(),
                    module: env!("CARGO_PKG_NAME"),
                    markers: vec![#lifetime_variant],
                    enabled: #enabled,
                    construct: std::sync::Arc::new(|scope: &sentry_di::ServiceScope| {
                        let instance = <#struct_name as sentry_di::Injectable>::construct(scope)?;
                        Ok(std::sync::Arc::new(instance) as sentry_di::SharedInstance)
                    }),
                    bindings: vec![#(#bindings),*],
                }
            }
        }

        // 在进入 main 之前把候选记录提交到全局模块注册表
        #[ctor::ctor]
        fn #registration_fn_name() {
            sentry_di::ModuleRegistry::global()
                .submit_candidate(<#struct_name as sentry_di::Discoverable>::candidate());
        }
    };

    TokenStream::from(expanded)
}
