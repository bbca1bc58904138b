// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for controllable values.

use proptest::prelude::*;
use understory_state::Controllable;

proptest! {
    #[test]
    fn setting_current_value_never_notifies(
        start in any::<i16>(),
        controlled in any::<bool>(),
        writes in prop::collection::vec(any::<i16>(), 0..20),
    ) {
        let mut c = if controlled {
            Controllable::controlled(start)
        } else {
            Controllable::uncontrolled(start)
        };
        for w in writes {
            let before = *c.get();
            let mut notified = false;
            let reported = c.set(w, |_| notified = true);
            prop_assert_eq!(reported, notified);
            prop_assert_eq!(notified, before != w);
            if controlled {
                prop_assert_eq!(*c.get(), start);
            } else {
                prop_assert_eq!(*c.get(), w);
            }
            // Repeating the same request is idempotent in uncontrolled mode.
            if !controlled {
                let again = c.set(w, |_| ());
                prop_assert!(!again);
            }
        }
    }

    #[test]
    fn chained_updates_equal_one_composed_update(
        start in any::<i16>(),
        controlled in any::<bool>(),
        f in (any::<i16>(), any::<i16>()),
        g in (any::<i16>(), any::<i16>()),
    ) {
        let apply = |(m, b): (i16, i16), x: i16| x.wrapping_mul(m).wrapping_add(b);
        let fresh = || if controlled {
            Controllable::controlled(start)
        } else {
            Controllable::uncontrolled(start)
        };

        // The owner of a controlled value echoes every change back.
        let mut chained = fresh();
        for step in [f, g] {
            let mut echoed = None;
            chained.update(|x| apply(step, *x), |next| echoed = Some(*next));
            if controlled && let Some(next) = echoed {
                chained.sync(Some(next));
            }
        }

        let mut composed = fresh();
        let mut echoed = None;
        composed.update(|x| apply(g, apply(f, *x)), |next| echoed = Some(*next));
        if controlled && let Some(next) = echoed {
            composed.sync(Some(next));
        }

        prop_assert_eq!(*chained.get(), *composed.get());
        prop_assert_eq!(*composed.get(), apply(g, apply(f, start)));
    }

    #[test]
    fn controlled_update_leaves_the_value_to_the_owner(
        start in any::<i16>(),
        delta in any::<i16>(),
    ) {
        let mut c = Controllable::controlled(start);
        let mut requested = None;
        c.update(|x| x.wrapping_add(delta), |next| requested = Some(*next));
        prop_assert_eq!(*c.get(), start);
        prop_assert_eq!(requested.is_some(), delta != 0);
    }
}
