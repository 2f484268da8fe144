//! KaTeX typesetting inside an embedded QuickJS interpreter.

use rquickjs::{CatchResultExt, Context, Function, Object, Runtime, Value};

use crate::adapters::{EngineError, TypesetOptions, TypesetSession, TypesetterAdapter};
use crate::Error;

const BRIDGE_NAME: &str = "__texfenceRender";

// Wraps the engine call so failures come back as plain data instead of a
// pending exception.
const BRIDGE: &str = r#"
globalThis.__texfenceRender = function __texfenceRender(source, options) {
    try {
        return { ok: true, html: String(katex.renderToString(source, options)) };
    } catch (e) {
        var name = (e && e.name) ? String(e.name) : "Error";
        var message = (e && e.message !== undefined) ? String(e.message) : String(e);
        var stack = (e && e.stack) ? String(e.stack) : "";
        return { ok: false, name: name, message: message, stack: stack };
    }
};
"#;

const ENGINE_CONTEXT: &str = "at renderToString (katex)";

/// Runs `katex.renderToString` from a KaTeX bundle supplied as source text.
///
/// Every [`begin`](TypesetterAdapter::begin) creates a new interpreter and
/// evaluates the bundle in it; the interpreter is torn down when the
/// session drops.
#[derive(Debug, Clone)]
pub struct QuickJsTypesetter {
    script: Vec<u8>,
}

impl QuickJsTypesetter {
    /// Use the KaTeX bundle `script` (for instance the contents of
    /// `katex.min.js`).
    pub fn new(script: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let script = script.into();
        if script.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::EngineUnavailable(
                "the typesetting script is empty".to_string(),
            ));
        }
        Ok(QuickJsTypesetter { script })
    }
}

impl TypesetterAdapter for QuickJsTypesetter {
    fn begin(&self) -> Result<Box<dyn TypesetSession + '_>, Error> {
        let unavailable = |e: rquickjs::Error| Error::EngineUnavailable(e.to_string());

        let runtime = Runtime::new().map_err(unavailable)?;
        let context = Context::full(&runtime).map_err(unavailable)?;

        context.with(|ctx| {
            ctx.eval::<Value, _>(self.script.clone())
                .catch(&ctx)
                .map_err(|e| Error::EngineUnavailable(format!("script failed to load: {}", e)))?;
            ctx.eval::<Value, _>(BRIDGE)
                .catch(&ctx)
                .map_err(|e| Error::EngineUnavailable(e.to_string()))?;

            let present: bool = ctx
                .eval("typeof katex === 'object' && typeof katex.renderToString === 'function'")
                .map_err(unavailable)?;
            if present {
                Ok(())
            } else {
                Err(Error::EngineUnavailable(
                    "script does not define katex.renderToString".to_string(),
                ))
            }
        })?;

        log::debug!("started QuickJS typesetting session");
        Ok(Box::new(QuickJsSession {
            context,
            _runtime: runtime,
        }))
    }
}

struct QuickJsSession {
    // Dropped before the runtime.
    context: Context,
    _runtime: Runtime,
}

impl TypesetSession for QuickJsSession {
    fn render_to_string(
        &mut self,
        source: &str,
        options: &TypesetOptions,
    ) -> Result<String, EngineError> {
        let outcome = self.context.with(|ctx| -> rquickjs::Result<Result<String, EngineError>> {
            let render: Function = ctx.globals().get(BRIDGE_NAME)?;

            let opts = Object::new(ctx.clone())?;
            opts.set("throwOnError", options.throw_on_error)?;
            opts.set("fleqn", options.fleqn)?;
            opts.set("displayMode", options.display_mode)?;
            opts.set("output", options.output.as_str())?;

            let result: Object = render.call((source, opts))?;
            if result.get::<_, bool>("ok")? {
                return Ok(Ok(result.get("html")?));
            }

            let name: String = result.get("name")?;
            let message: String = result.get("message")?;
            let stack: String = result.get("stack")?;
            Ok(Err(engine_error(&name, &message, &stack)))
        });

        outcome.unwrap_or_else(|e| {
            Err(EngineError::new(format!("InternalError: {}", e), ENGINE_CONTEXT))
        })
    }
}

impl Drop for QuickJsSession {
    fn drop(&mut self) {
        log::trace!("tearing down QuickJS typesetting session");
    }
}

/// Turn a JS exception into frames: the message first, then one frame per
/// line of the stack trace, innermost first.  Frames from the bridge and the
/// top-level script are dropped, and the engine entry point is always the
/// outermost frame.
pub(crate) fn engine_error(name: &str, message: &str, stack: &str) -> EngineError {
    let mut lines = stack
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.contains(BRIDGE_NAME) && !l.starts_with("at <eval>"));

    let mut err = EngineError::new(
        format!("{}: {}", name, message),
        lines.next().unwrap_or(ENGINE_CONTEXT),
    );
    for line in lines {
        err = err.with_frame(String::new(), line);
    }
    if err.frames.last().map_or(true, |f| f.context != ENGINE_CONTEXT) {
        err = err.with_frame(String::new(), ENGINE_CONTEXT);
    }
    err
}
