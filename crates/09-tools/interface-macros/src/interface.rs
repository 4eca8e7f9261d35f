//! 接口声明宏实现

use crate::utils::{registration_fn_ident, string_value, validate_port};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, punctuated::Punctuated, DeriveInput, Error, Ident, Item,
    Meta, Result, Token,
};

/// 接口声明参数
#[derive(Debug, Clone, Default)]
pub struct InterfaceArgs {
    /// 所属端口
    pub port: Option<String>,
    /// 自定义接口名称
    pub name: Option<String>,
    /// 描述
    pub description: Option<String>,
}

impl Parse for InterfaceArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = InterfaceArgs::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            let Meta::NameValue(nv) = meta else {
                return Err(Error::new_spanned(meta, "参数格式应为 key = \"value\""));
            };
            if nv.path.is_ident("port") {
                let port = string_value("port", &nv.value)?;
                validate_port(&port).map_err(|message| Error::new_spanned(&nv.value, message))?;
                args.port = Some(port);
            } else if nv.path.is_ident("name") {
                args.name = Some(string_value("name", &nv.value)?);
            } else if nv.path.is_ident("description") {
                args.description = Some(string_value("description", &nv.value)?);
            } else {
                return Err(Error::new_spanned(
                    &nv.path,
                    "未知参数，支持的参数: port, name, description",
                ));
            }
        }

        Ok(args)
    }
}

/// 实现 #[interface] 宏
pub fn interface_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = match syn::parse::<InterfaceArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };
    let item = match syn::parse::<Item>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };

    let (ident, target, generics_empty) = match &item {
        Item::Trait(item_trait) => {
            let ident = &item_trait.ident;
            (
                ident.clone(),
                quote! { dyn #ident },
                item_trait.generics.params.is_empty(),
            )
        }
        Item::Struct(item_struct) => {
            let ident = &item_struct.ident;
            (ident.clone(), quote! { #ident }, item_struct.generics.params.is_empty())
        }
        Item::Enum(item_enum) => {
            let ident = &item_enum.ident;
            (ident.clone(), quote! { #ident }, item_enum.generics.params.is_empty())
        }
        other => {
            return Error::new_spanned(other, "#[interface] 只能用于 trait、结构体或枚举")
                .to_compile_error()
                .into()
        }
    };

    if !generics_empty {
        return Error::new(ident.span(), "#[interface] 不支持泛型接口")
            .to_compile_error()
            .into();
    }

    let generated = match generate_interface(&ident, &target, &args) {
        Ok(generated) => generated,
        Err(e) => return e.to_compile_error().into(),
    };

    let expanded = quote! {
        #item

        #generated
    };

    TokenStream::from(expanded)
}

/// 实现 #[derive(Interface)] 宏
pub fn derive_interface_impl(input: DeriveInput) -> TokenStream {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Error::new(ident.span(), "#[derive(Interface)] 不支持泛型类型")
            .to_compile_error()
            .into();
    }

    let mut args = None;
    for attr in &input.attrs {
        if attr.path().is_ident("hexwire") {
            match attr.parse_args::<InterfaceArgs>() {
                Ok(parsed) => args = Some(parsed),
                Err(e) => return e.to_compile_error().into(),
            }
        }
    }
    let Some(args) = args else {
        return Error::new(
            ident.span(),
            "#[derive(Interface)] 需要 #[hexwire(port = \"...\")] 属性",
        )
        .to_compile_error()
        .into();
    };

    let target = quote! { #ident };
    match generate_interface(ident, &target, &args) {
        Ok(generated) => TokenStream::from(generated),
        Err(e) => e.to_compile_error().into(),
    }
}

/// 生成 `Interface` 实现与启动时注册代码
fn generate_interface(
    ident: &Ident,
    target: &TokenStream2,
    args: &InterfaceArgs,
) -> Result<TokenStream2> {
    let Some(port) = args.port.as_deref() else {
        return Err(Error::new(
            Span::call_site(),
            "缺少 `port` 参数，每个接口必须属于一个端口",
        ));
    };
    let name = args.name.clone().unwrap_or_else(|| ident.to_string());
    let description = args.description.as_ref().map(|description| {
        quote! { .with_description(#description) }
    });
    let registration_fn_name = registration_fn_ident(ident);

    Ok(quote! {
        impl ::hexwire_common::Interface for #target {
            fn info() -> ::hexwire_common::InterfaceInfo {
                ::hexwire_common::InterfaceInfo::new::<#target>(#name, #port) #description
            }
        }

        // 使用 ctor 在程序启动时自动注册接口
        #[ctor::ctor]
        fn #registration_fn_name() {
            ::hexwire_common::register_interface(
                <#target as ::hexwire_common::Interface>::info(),
            );
        }
    })
}
