// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Two-phase actions
//!
//! A builder's `prepare` returns constraints plus an [`Action`]: the deferred
//! submit step. The action is a core async call against the chain wrapped by
//! pure `before` (canonical request -> native request) and `after` (native
//! result -> canonical result) translations. Anything the translations need
//! is captured at prepare time and never mutated afterwards.

use std::{fmt, future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};

use crate::error::SdkError;

type Run<Req, Res> = dyn Fn(Req) -> BoxFuture<'static, Result<Res, SdkError>> + Send + Sync;

/// Deferred submit step of a prepared operation
///
/// Submitting twice is allowed but repeats the chain call.
pub struct Action<Req, Res> {
	id: &'static str,
	run: Arc<Run<Req, Res>>,
}

impl<Req, Res> Clone for Action<Req, Res> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			run: self.run.clone(),
		}
	}
}

impl<Req, Res> fmt::Debug for Action<Req, Res> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Action").field("id", &self.id).finish()
	}
}

impl<Req, Res> Action<Req, Res>
where
	Req: Send + 'static,
	Res: Send + 'static,
{
	/// Create an action from its core chain call
	pub fn new<F, Fut>(id: &'static str, run: F) -> Self
	where
		F: Fn(Req) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Res, SdkError>> + Send + 'static,
	{
		Self {
			id,
			run: Arc::new(move |request: Req| run(request).boxed()),
		}
	}

	pub fn id(&self) -> &'static str {
		self.id
	}

	/// Run the action
	pub async fn submit(&self, request: Req) -> Result<Res, SdkError> {
		(self.run)(request).await
	}

	/// Translate requests before they reach the core call
	///
	/// A failed translation short-circuits: the core call never runs.
	pub fn before<R, F>(self, translate: F) -> Action<R, Res>
	where
		R: Send + 'static,
		F: Fn(R) -> Result<Req, SdkError> + Send + Sync + 'static,
	{
		let run = self.run;
		Action {
			id: self.id,
			run: Arc::new(move |request: R| match translate(request) {
				Ok(native) => run(native),
				Err(e) => futures::future::ready(Err(e)).boxed(),
			}),
		}
	}

	/// Translate results coming out of the core call
	pub fn after<R, F>(self, translate: F) -> Action<Req, R>
	where
		R: Send + 'static,
		F: Fn(Res) -> Result<R, SdkError> + Send + Sync + 'static,
	{
		let run = self.run;
		let translate = Arc::new(translate);
		Action {
			id: self.id,
			run: Arc::new(move |request: Req| {
				let translate = translate.clone();
				let pending = run(request);
				async move { translate(pending.await?) }.boxed()
			}),
		}
	}
}
