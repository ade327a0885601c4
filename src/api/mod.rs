// src/api/mod.rs

//! Host API surface injected into every guest interpreter.
//!
//! Everything lives under one global table, [`API_GLOBAL`]:
//!
//! ```lua
//! installer.VERSION                     -- branding constants
//! installer.job.module_name             -- read-only job metadata
//! installer.job:setprogress(0.5)
//! installer.globalstorage:insert("k", v) -- shared store proxy
//! installer.utils.debug("hello")        -- utility namespace
//! ```
//!
//! Proxies are created fresh for each execution and die with the
//! interpreter.

pub mod convert;
pub mod job_proxy;
pub mod storage_proxy;
pub mod utils;

use mlua::Lua;

use crate::job::HostContext;

pub use job_proxy::{JobProxy, JobSnapshot};
pub use storage_proxy::StorageProxy;
pub use utils::obscure;

/// Name of the global table holding the host API.
pub const API_GLOBAL: &str = "installer";

/// Install the host API into `lua`'s globals.
pub fn install(lua: &Lua, snapshot: JobSnapshot, context: &HostContext) -> mlua::Result<()> {
    let module_name = snapshot.module_name.clone();
    let api = lua.create_table()?;

    let branding = &context.branding;
    api.set("ORGANIZATION_NAME", branding.organization_name.as_str())?;
    api.set("ORGANIZATION_DOMAIN", branding.organization_domain.as_str())?;
    api.set("APPLICATION_NAME", branding.application_name.as_str())?;
    api.set("VERSION", branding.version.as_str())?;
    api.set("VERSION_SHORT", branding.version_short.as_str())?;

    let job = JobProxy::new(snapshot, context.observer.clone());
    api.set("job", lua.create_userdata(job)?)?;

    let storage = StorageProxy::new(context.storage.clone());
    api.set("globalstorage", lua.create_userdata(storage)?)?;

    api.set("utils", utils::create(lua, &module_name, context)?)?;

    lua.globals().set(API_GLOBAL, api)?;
    Ok(())
}
