#![no_main]

use libfuzzer_sys::fuzz_target;

use texfence::{
    render_document, EngineError, Error, Options, TypesetOptions, TypesetSession,
    TypesetterAdapter,
};

struct Echo;

impl TypesetSession for Echo {
    fn render_to_string(
        &mut self,
        source: &str,
        _options: &TypesetOptions,
    ) -> Result<String, EngineError> {
        Ok(format!("<span class=\"katex\">{}</span>", source.len()))
    }
}

impl TypesetterAdapter for Echo {
    fn begin(&self) -> Result<Box<dyn TypesetSession + '_>, Error> {
        Ok(Box::new(Echo))
    }
}

fuzz_target!(|s: &str| {
    if s.is_empty() {
        return;
    }

    let outcome = render_document(s, &Options::default(), &|f: &str| f.to_string(), &Echo).unwrap();
    assert!(outcome.is_clean());
});
