//! Defines the route handler for the page for creating a wallet.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

fn new_wallet_form_view() -> Markup {
    let create_wallet_endpoint = endpoints::POST_WALLET;

    html! {
        form
            hx-post=(create_wallet_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="Main GCash"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus;
            }

            div
            {
                label for="cell_number" class=(FORM_LABEL_STYLE) { "Cell Number" }

                input
                    type="tel"
                    name="cell_number"
                    id="cell_number"
                    placeholder="09171234567"
                    pattern=r"(\+639|09)\d{9}"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="wallet_type" class=(FORM_LABEL_STYLE) { "Provider" }

                input
                    type="text"
                    name="wallet_type"
                    id="wallet_type"
                    placeholder="GCash"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="default_rate" class=(FORM_LABEL_STYLE) { "Default Fee Rate" }

                input
                    type="number"
                    name="default_rate"
                    id="default_rate"
                    value="0.02"
                    min="0.01"
                    step="0.001"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    "Used to suggest fees when no custom fee range matches."
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Wallet" }
        }
    }
}

/// Renders the page for creating a wallet.
pub async fn get_create_wallet_page() -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_WALLET_VIEW).into_html();
    let form = new_wallet_form_view();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "New Wallet" }
            (form)
        }
    };

    Html(base("Create Wallet", &[], &content).into_string()).into_response()
}

#[cfg(test)]
mod tests {
    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_create_wallet_page;

    #[tokio::test]
    async fn renders_wallet_form() {
        let response = get_create_wallet_page().await;

        assert_status_ok(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::POST_WALLET, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "cell_number", "tel");
        assert_form_input(&form, "wallet_type", "text");
        assert_form_input(&form, "default_rate", "number");
        assert_form_submit_button_with_text(&form, "Create Wallet");
    }
}
