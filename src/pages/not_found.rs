use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="not-found">
			<h1>"404"</h1>
			<p>"The page you were looking for doesn't exist."</p>
			<a href="/">"Back to the homepage"</a>
		</main>
	}
}
