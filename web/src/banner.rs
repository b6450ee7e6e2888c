use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct BannerProps {
    pub text: AttrValue,
    #[prop_or_default]
    pub shown: bool,
}

/// Win/lose banner; slides in and out through the `in`/`out` classes.
#[function_component(BannerView)]
pub(crate) fn banner_component(props: &BannerProps) -> Html {
    let class = classes!("message", if props.shown { "in" } else { "out" });
    html! {
        <div {class} role="status">{props.text.to_string()}</div>
    }
}
