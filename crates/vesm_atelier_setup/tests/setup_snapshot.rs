//! Script setup compiler snapshot tests.
//!
//! Each case compiles a complete `<script setup>` block and compares the
//! generated component module.

use vesm_atelier_setup::{compile_script_setup, transform_es_module, ScriptSetupOptions};

/// Helper to compile with a component name
fn compile(name: &str, src: &str) -> String {
    match compile_script_setup(src, &ScriptSetupOptions::with_component_name(name)) {
        Ok(code) => code,
        Err(err) => panic!("Compilation error: {}", err),
    }
}

// =============================================================================
// Runtime Declarations
// =============================================================================

mod runtime {
    use super::*;

    #[test]
    fn counter_with_child_component() {
        let src = r#"import { ref, computed } from 'vue'
import Child from './Child.vue'

const props = defineProps({ start: Number })
const emit = defineEmits(['change'])
const count = ref(props.start)
const double = computed(() => count.value * 2)
function inc() {
  count.value++
  emit('change', count.value)
}"#;
        insta::assert_snapshot!(compile("Counter", src), @r#"
module.exports = {
  name: "Counter",
  components: {
    "Child": vueEsmRuntime("./Child.vue"),
    "child": vueEsmRuntime("./Child.vue")
  },
  props: { start: Number },
  emits: ['change'],
  setup: function(__props__, __ctx__) {
    var __emit__ = __ctx__.emit;
    var { ref, computed } = require("vue");

const props = __props__
const emit = __emit__
const count = ref(props.start)
const double = computed(() => count.value * 2)
function inc() {
  count.value++
  emit('change', count.value)
}

    return {
      props: props,
      emit: emit,
      count: count,
      double: double,
      inc: inc
    };
  }
}
"#);
    }

    #[test]
    fn defaults_expose_and_await() {
        let src = r#"const { title, size } = withDefaults(defineProps(['title', 'size']), { size: 'md' })
const data = await load(title)
defineExpose({ data })"#;
        insta::assert_snapshot!(compile("SetupComponent", src), @r#"
module.exports = {
  name: "SetupComponent",
  props: ['title', 'size'],
  setup: async function(__props__, __ctx__) {
    var __emit__ = __ctx__.emit;
    var __applyDefaults__ = function(__props__, __defaults__) {
      var result = {};
      if (__defaults__) {
        Object.keys(__defaults__).forEach(function(key) {
          result[key] = __defaults__[key];
        });
      }
      if (__props__) {
        Object.keys(__props__).forEach(function(key) {
          if (__props__[key] !== undefined) result[key] = __props__[key];
        });
      }
      return result;
    };

const { title, size } = __applyDefaults__(__props__, { size: 'md' })
const data = await load(title)

    __ctx__.expose({ data });
    return {
      data: data
    };
  }
}
"#);
    }
}

// =============================================================================
// Type-only Declarations
// =============================================================================

mod type_only {
    use super::*;

    #[test]
    fn typed_props_and_emits() {
        let src = r#"const props = defineProps<{ msg: string }>()
const emit = defineEmits<{ (e: 'save', id: number): void; (e: 'close'): void }>()"#;
        insta::assert_snapshot!(compile("SetupComponent", src), @r#"
module.exports = {
  name: "SetupComponent",
  props: {},
  emits: ["save", "close"],
  setup: function(__props__, __ctx__) {
    var __emit__ = __ctx__.emit;

const props = __props__
const emit = __emit__

    return {
      props: props,
      emit: emit
    };
  }
}
"#);
    }
}

// =============================================================================
// Plain Scripts
// =============================================================================

mod es_module {
    use super::*;

    #[test]
    fn options_api_component() {
        let src = r#"import { ref } from 'vue'
import Item from './Item.vue'
export const version = '1.0'
export default {
  components: { Item },
  setup() { return { n: ref(0) } }
}"#;
        insta::assert_snapshot!(transform_es_module(src, &ScriptSetupOptions::default()), @r#"
const { ref } = require("vue")
const Item = vueEsmRuntime("./Item.vue")
const version = module.exports.version = '1.0'
module.exports = {
  components: { Item },
  setup() { return { n: ref(0) } }
}
"#);
    }
}
