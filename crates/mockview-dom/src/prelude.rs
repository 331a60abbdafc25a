//! Script-side DOM: node classes, events, timers, console capture.
//!
//! Evaluated once per document before any page script. Everything the host
//! needs lives on the non-enumerable `__mockview_dom` global.

use serde::Serialize;

use mockview_common::DomError;

use crate::location::LocationParts;
use crate::parse::NodeRecord;

pub(crate) const DOM_PRELUDE: &str = r##"
(function (global) {
  'use strict';

  var host = {
    readyState: 'loading',
    console: [],
    errors: [],
    timers: [],
    cancelled: {},
    nextTimerId: 1,
    seq: 0,
    clock: 0
  };
  Object.defineProperty(global, '__mockview_dom', {
    value: host, enumerable: false, configurable: false, writable: false
  });

  function hidden(target, name, value) {
    Object.defineProperty(target, name, {
      value: value, enumerable: false, configurable: true, writable: true
    });
  }

  function describe(value) {
    if (typeof value === 'string') return value;
    if (value instanceof Error) return String(value);
    if (value instanceof Node) return opaqueNode(value);
    try {
      var json = JSON.stringify(value);
      return json === undefined ? String(value) : json;
    } catch (e) {
      return String(value);
    }
  }

  host.reportError = function (error, origin) {
    host.errors.push({ origin: String(origin), message: describe(error) });
  };

  // ---- events ----

  function EventTarget() {}
  EventTarget.prototype.addEventListener = function (type, listener) {
    if (!listener) return;
    if (!Object.prototype.hasOwnProperty.call(this, '__listeners')) hidden(this, '__listeners', {});
    var key = String(type);
    var list = this.__listeners[key] || (this.__listeners[key] = []);
    if (list.indexOf(listener) < 0) list.push(listener);
  };
  EventTarget.prototype.removeEventListener = function (type, listener) {
    if (!Object.prototype.hasOwnProperty.call(this, '__listeners')) return;
    var list = this.__listeners[String(type)];
    if (!list) return;
    var index = list.indexOf(listener);
    if (index >= 0) list.splice(index, 1);
  };
  EventTarget.prototype.dispatchEvent = function (event) {
    if (!(event instanceof Event)) {
      throw new TypeError("Failed to execute 'dispatchEvent': parameter 1 is not of type 'Event'.");
    }
    event.target = this;
    var path = [this];
    if (event.bubbles) {
      var node = this.parentNode;
      while (node) {
        path.push(node);
        node = node.parentNode;
      }
      if (path[path.length - 1] === global.document) path.push(global);
    }
    for (var i = 0; i < path.length && !event.__stopped; i++) invoke(path[i], event);
    event.currentTarget = null;
    return !event.defaultPrevented;
  };

  function invoke(target, event) {
    event.currentTarget = target;
    var own = Object.prototype.hasOwnProperty.call(target, '__listeners') ? target.__listeners : null;
    var list = own && own[event.type] ? own[event.type].slice() : [];
    var handler = target['on' + event.type];
    if (typeof handler === 'function') list.push(handler);
    for (var i = 0; i < list.length; i++) {
      var listener = list[i];
      try {
        if (typeof listener === 'function') listener.call(target, event);
        else if (listener && typeof listener.handleEvent === 'function') listener.handleEvent(event);
      } catch (error) {
        host.reportError(error, 'listener:' + event.type);
      }
      if (event.__stoppedImmediate) break;
    }
  }

  function Event(type, init) {
    if (!(this instanceof Event)) {
      throw new TypeError("Failed to construct 'Event': Please use the 'new' operator.");
    }
    init = init || {};
    this.type = String(type);
    this.bubbles = !!init.bubbles;
    this.cancelable = !!init.cancelable;
    this.defaultPrevented = false;
    this.target = null;
    this.currentTarget = null;
    this.timeStamp = host.clock;
    hidden(this, '__stopped', false);
    hidden(this, '__stoppedImmediate', false);
  }
  Event.prototype.preventDefault = function () {
    if (this.cancelable) this.defaultPrevented = true;
  };
  Event.prototype.stopPropagation = function () {
    this.__stopped = true;
  };
  Event.prototype.stopImmediatePropagation = function () {
    this.__stopped = true;
    this.__stoppedImmediate = true;
  };

  function MessageEvent(type, init) {
    Event.call(this, type, init);
    init = init || {};
    this.data = init.data === undefined ? null : init.data;
    this.origin = init.origin === undefined ? '' : String(init.origin);
    this.source = init.source === undefined ? null : init.source;
  }
  MessageEvent.prototype = Object.create(Event.prototype);
  MessageEvent.prototype.constructor = MessageEvent;

  function CustomEvent(type, init) {
    Event.call(this, type, init);
    this.detail = init && init.detail !== undefined ? init.detail : null;
  }
  CustomEvent.prototype = Object.create(Event.prototype);
  CustomEvent.prototype.constructor = CustomEvent;

  // ---- nodes ----

  var VOID = { area: 1, base: 1, br: 1, col: 1, embed: 1, hr: 1, img: 1, input: 1,
               link: 1, meta: 1, source: 1, track: 1, wbr: 1 };
  var RAW_TEXT = { script: 1, style: 1 };

  function isElement(node) {
    return node.nodeType === 1;
  }

  function Node(nodeType, nodeName) {
    this.nodeType = nodeType;
    this.nodeName = nodeName;
    this.parentNode = null;
    this.childNodes = [];
  }
  Node.prototype = Object.create(EventTarget.prototype);
  Node.prototype.constructor = Node;
  Node.ELEMENT_NODE = 1;
  Node.TEXT_NODE = 3;
  Node.DOCUMENT_NODE = 9;

  function checkNode(node, method) {
    if (!(node instanceof Node)) {
      throw new TypeError("Failed to execute '" + method + "' on 'Node': parameter 1 is not of type 'Node'.");
    }
  }

  function detach(child) {
    if (child.parentNode) child.parentNode.removeChild(child);
  }

  Node.prototype.appendChild = function (child) {
    checkNode(child, 'appendChild');
    detach(child);
    child.parentNode = this;
    this.childNodes.push(child);
    return child;
  };
  Node.prototype.insertBefore = function (child, reference) {
    checkNode(child, 'insertBefore');
    if (reference === null || reference === undefined) return this.appendChild(child);
    if (this.childNodes.indexOf(reference) < 0) {
      throw new Error('NotFoundError: The node before which the new node is to be inserted is not a child of this node.');
    }
    detach(child);
    child.parentNode = this;
    this.childNodes.splice(this.childNodes.indexOf(reference), 0, child);
    return child;
  };
  Node.prototype.removeChild = function (child) {
    var index = this.childNodes.indexOf(child);
    if (index < 0) throw new Error('NotFoundError: The node to be removed is not a child of this node.');
    this.childNodes.splice(index, 1);
    child.parentNode = null;
    return child;
  };
  Node.prototype.remove = function () {
    if (this.parentNode) this.parentNode.removeChild(this);
  };
  Node.prototype.hasChildNodes = function () {
    return this.childNodes.length > 0;
  };
  Node.prototype.contains = function (other) {
    while (other) {
      if (other === this) return true;
      other = other.parentNode;
    }
    return false;
  };

  // Tree walks use an explicit stack; deep documents must not grow the native one.
  function pushChildren(stack, node) {
    for (var i = node.childNodes.length - 1; i >= 0; i--) stack.push(node.childNodes[i]);
  }

  function sibling(node, offset) {
    if (!node.parentNode) return null;
    var siblings = node.parentNode.childNodes;
    return siblings[siblings.indexOf(node) + offset] || null;
  }

  Object.defineProperties(Node.prototype, {
    firstChild: { get: function () { return this.childNodes[0] || null; } },
    lastChild: { get: function () { return this.childNodes[this.childNodes.length - 1] || null; } },
    nextSibling: { get: function () { return sibling(this, 1); } },
    previousSibling: { get: function () { return sibling(this, -1); } },
    parentElement: {
      get: function () { return this.parentNode && isElement(this.parentNode) ? this.parentNode : null; }
    },
    ownerDocument: { get: function () { return this.nodeType === 9 ? null : global.document; } },
    textContent: {
      get: function () {
        var out = '';
        var stack = this.childNodes.slice().reverse();
        while (stack.length) {
          var node = stack.pop();
          if (node.nodeType === 3) out += node.data;
          else if (isElement(node)) pushChildren(stack, node);
        }
        return out;
      },
      set: function (value) {
        while (this.childNodes.length) this.removeChild(this.childNodes[0]);
        var text = value === null || value === undefined ? '' : String(value);
        if (text) this.appendChild(new Text(text));
      }
    }
  });

  function Text(data) {
    Node.call(this, 3, '#text');
    this.data = data === null || data === undefined ? '' : String(data);
  }
  Text.prototype = Object.create(Node.prototype);
  Text.prototype.constructor = Text;
  var textData = {
    get: function () { return this.data; },
    set: function (value) { this.data = value === null || value === undefined ? '' : String(value); }
  };
  Object.defineProperty(Text.prototype, 'textContent', textData);
  Object.defineProperty(Text.prototype, 'nodeValue', textData);

  function Element(localName) {
    var name = String(localName).toLowerCase();
    Node.call(this, 1, name.toUpperCase());
    this.localName = name;
    this.tagName = this.nodeName;
    this.style = {};
    hidden(this, '__attrs', []);
  }
  Element.prototype = Object.create(Node.prototype);
  Element.prototype.constructor = Element;

  function findAttr(element, name) {
    var key = String(name).toLowerCase();
    for (var i = 0; i < element.__attrs.length; i++) {
      if (element.__attrs[i][0] === key) return i;
    }
    return -1;
  }

  Element.prototype.getAttribute = function (name) {
    var index = findAttr(this, name);
    return index < 0 ? null : this.__attrs[index][1];
  };
  Element.prototype.setAttribute = function (name, value) {
    var index = findAttr(this, name);
    var text = String(value);
    if (index < 0) this.__attrs.push([String(name).toLowerCase(), text]);
    else this.__attrs[index][1] = text;
  };
  Element.prototype.hasAttribute = function (name) {
    return findAttr(this, name) >= 0;
  };
  Element.prototype.removeAttribute = function (name) {
    var index = findAttr(this, name);
    if (index >= 0) this.__attrs.splice(index, 1);
  };
  Element.prototype.getAttributeNames = function () {
    return this.__attrs.map(function (pair) { return pair[0]; });
  };
  Element.prototype.toString = function () {
    return '[object HTMLElement]';
  };

  function reflect(property, attribute) {
    Object.defineProperty(Element.prototype, property, {
      get: function () {
        var value = this.getAttribute(attribute);
        return value === null ? '' : value;
      },
      set: function (value) { this.setAttribute(attribute, value); }
    });
  }
  reflect('id', 'id');
  reflect('className', 'class');

  function escapeText(text) {
    return text.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
  }
  function escapeAttr(text) {
    return text.replace(/&/g, '&amp;').replace(/"/g, '&quot;');
  }

  function serializeText(node) {
    return node.parentNode && RAW_TEXT[node.parentNode.localName] ? node.data : escapeText(node.data);
  }
  function openTag(node) {
    var out = '<' + node.localName;
    for (var i = 0; i < node.__attrs.length; i++) {
      out += ' ' + node.__attrs[i][0] + '="' + escapeAttr(node.__attrs[i][1]) + '"';
    }
    return out + '>';
  }

  function serialize(node) {
    if (node.nodeType === 3) return serializeText(node);
    if (!isElement(node)) return '';
    if (VOID[node.localName]) return openTag(node);
    return openTag(node) + serializeChildren(node) + '</' + node.localName + '>';
  }
  // Stack entries are nodes still to open or closing tags already owed.
  function serializeChildren(node) {
    var out = '';
    var stack = node.childNodes.slice().reverse();
    while (stack.length) {
      var item = stack.pop();
      if (typeof item === 'string') {
        out += item;
      } else if (item.nodeType === 3) {
        out += serializeText(item);
      } else if (isElement(item)) {
        out += openTag(item);
        if (VOID[item.localName]) continue;
        stack.push('</' + item.localName + '>');
        pushChildren(stack, item);
      }
    }
    return out;
  }

  var ENTITIES = { amp: '&', lt: '<', gt: '>', quot: '"', apos: "'", nbsp: '\u00a0' };

  function decodeEntities(text) {
    return text.replace(/&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);/g, function (match, body) {
      if (body.charAt(0) === '#') {
        var hex = body.charAt(1) === 'x' || body.charAt(1) === 'X';
        var code = hex ? parseInt(body.slice(2), 16) : parseInt(body.slice(1), 10);
        return isNaN(code) || code > 0x10ffff ? match : String.fromCodePoint(code);
      }
      return Object.prototype.hasOwnProperty.call(ENTITIES, body) ? ENTITIES[body] : match;
    });
  }

  var TAG = /^<\/?([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s"'>\/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(\/?)>/;
  var ATTR = /([^\s"'>\/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?/g;

  function appendText(parent, text) {
    if (text) parent.appendChild(new Text(decodeEntities(text)));
  }

  // Fragment parser for innerHTML assignment. Scripts it creates never run.
  function parseFragment(html) {
    var root = new Element('template');
    var stack = [root];
    var pos = 0;
    while (pos < html.length) {
      var current = stack[stack.length - 1];
      var lt = html.indexOf('<', pos);
      if (lt < 0) {
        appendText(current, html.slice(pos));
        break;
      }
      if (lt > pos) {
        appendText(current, html.slice(pos, lt));
        pos = lt;
      }
      if (html.startsWith('<!--', pos)) {
        var close = html.indexOf('-->', pos + 4);
        pos = close < 0 ? html.length : close + 3;
        continue;
      }
      var match = TAG.exec(html.slice(pos));
      if (!match) {
        appendText(current, '<');
        pos += 1;
        continue;
      }
      pos += match[0].length;
      var name = match[1].toLowerCase();
      if (match[0].charAt(1) === '/') {
        for (var i = stack.length - 1; i > 0; i--) {
          if (stack[i].localName === name) {
            stack.length = i;
            break;
          }
        }
        continue;
      }
      var element = new Element(name);
      var attr;
      ATTR.lastIndex = 0;
      while ((attr = ATTR.exec(match[2])) !== null) {
        var value = attr[2] !== undefined ? attr[2] : attr[3] !== undefined ? attr[3] : attr[4] !== undefined ? attr[4] : '';
        element.setAttribute(attr[1], decodeEntities(value));
      }
      current.appendChild(element);
      if (RAW_TEXT[name]) {
        var end = html.toLowerCase().indexOf('</' + name, pos);
        var raw = end < 0 ? html.slice(pos) : html.slice(pos, end);
        if (raw) element.appendChild(new Text(raw));
        if (end < 0) {
          pos = html.length;
        } else {
          var gt = html.indexOf('>', end);
          pos = gt < 0 ? html.length : gt + 1;
        }
        continue;
      }
      if (!VOID[name] && match[3] !== '/') stack.push(element);
    }
    return root.childNodes.slice();
  }

  Object.defineProperties(Element.prototype, {
    children: { get: function () { return this.childNodes.filter(isElement); } },
    childElementCount: { get: function () { return this.children.length; } },
    firstElementChild: { get: function () { return this.children[0] || null; } },
    attributes: {
      get: function () {
        return this.__attrs.map(function (pair) { return { name: pair[0], value: pair[1] }; });
      }
    },
    innerText: Object.getOwnPropertyDescriptor(Node.prototype, 'textContent'),
    outerHTML: { get: function () { return serialize(this); } },
    innerHTML: {
      get: function () { return serializeChildren(this); },
      set: function (value) {
        while (this.childNodes.length) this.removeChild(this.childNodes[0]);
        var nodes = parseFragment(value === null || value === undefined ? '' : String(value));
        for (var i = 0; i < nodes.length; i++) this.appendChild(nodes[i]);
      }
    }
  });

  // ---- selectors: compound tag#id.class[attr=value], descendant, comma lists ----

  var IDENT = /^[A-Za-z0-9_\-]+/;

  function invalidSelector(selector) {
    return new SyntaxError("'" + selector + "' is not a valid selector");
  }

  function parseCompound(text, selector) {
    var compound = { tag: null, id: null, classes: [], attrs: [] };
    var rest = text;
    if (rest.charAt(0) === '*') {
      rest = rest.slice(1);
    } else {
      var tag = IDENT.exec(rest);
      if (tag) {
        compound.tag = tag[0].toLowerCase();
        rest = rest.slice(tag[0].length);
      }
    }
    while (rest.length) {
      var c = rest.charAt(0);
      if (c === '#' || c === '.') {
        var name = IDENT.exec(rest.slice(1));
        if (!name) throw invalidSelector(selector);
        if (c === '#') compound.id = name[0];
        else compound.classes.push(name[0]);
        rest = rest.slice(1 + name[0].length);
      } else if (c === '[') {
        var end = rest.indexOf(']');
        if (end < 0) throw invalidSelector(selector);
        var body = rest.slice(1, end);
        var eq = body.indexOf('=');
        if (eq < 0) {
          compound.attrs.push({ name: body.trim().toLowerCase(), value: null });
        } else {
          compound.attrs.push({
            name: body.slice(0, eq).trim().toLowerCase(),
            value: body.slice(eq + 1).trim().replace(/^["']|["']$/g, '')
          });
        }
        rest = rest.slice(end + 1);
      } else {
        throw invalidSelector(selector);
      }
    }
    return compound;
  }

  function parseSelectorList(selector) {
    var text = String(selector).trim();
    if (!text) throw invalidSelector(selector);
    return text.split(',').map(function (part) {
      var trimmed = part.trim();
      if (!trimmed) throw invalidSelector(selector);
      return trimmed.split(/\s+/).map(function (step) { return parseCompound(step, selector); });
    });
  }

  function matchesCompound(element, compound) {
    if (compound.tag && element.localName !== compound.tag) return false;
    if (compound.id !== null && element.getAttribute('id') !== compound.id) return false;
    if (compound.classes.length) {
      var classes = element.className.split(/\s+/);
      for (var i = 0; i < compound.classes.length; i++) {
        if (classes.indexOf(compound.classes[i]) < 0) return false;
      }
    }
    for (var j = 0; j < compound.attrs.length; j++) {
      var value = element.getAttribute(compound.attrs[j].name);
      if (value === null) return false;
      if (compound.attrs[j].value !== null && value !== compound.attrs[j].value) return false;
    }
    return true;
  }

  function matchesSteps(element, steps) {
    if (!matchesCompound(element, steps[steps.length - 1])) return false;
    var node = element.parentNode;
    for (var i = steps.length - 2; i >= 0; i--) {
      while (node && !(isElement(node) && matchesCompound(node, steps[i]))) node = node.parentNode;
      if (!node) return false;
      node = node.parentNode;
    }
    return true;
  }

  function descendants(root, out) {
    var stack = root.childNodes.slice().reverse();
    while (stack.length) {
      var node = stack.pop();
      if (!isElement(node)) continue;
      out.push(node);
      pushChildren(stack, node);
    }
    return out;
  }

  function selectAll(root, selector) {
    var list = parseSelectorList(selector);
    return descendants(root, []).filter(function (element) {
      return list.some(function (steps) { return matchesSteps(element, steps); });
    });
  }

  var queries = {
    querySelectorAll: function (selector) { return selectAll(this, selector); },
    querySelector: function (selector) { return selectAll(this, selector)[0] || null; },
    getElementsByTagName: function (name) {
      var key = String(name).toLowerCase();
      return descendants(this, []).filter(function (element) {
        return key === '*' || element.localName === key;
      });
    },
    getElementsByClassName: function (names) {
      var wanted = String(names).trim().split(/\s+/);
      return descendants(this, []).filter(function (element) {
        var classes = element.className.split(/\s+/);
        return wanted.every(function (name) { return classes.indexOf(name) >= 0; });
      });
    }
  };

  Element.prototype.matches = function (selector) {
    var list = parseSelectorList(selector);
    var element = this;
    return list.some(function (steps) { return matchesSteps(element, steps); });
  };
  Element.prototype.closest = function (selector) {
    var node = this;
    while (node && isElement(node)) {
      if (node.matches(selector)) return node;
      node = node.parentNode;
    }
    return null;
  };

  function Document() {
    Node.call(this, 9, '#document');
  }
  Document.prototype = Object.create(Node.prototype);
  Document.prototype.constructor = Document;

  Object.keys(queries).forEach(function (name) {
    Element.prototype[name] = queries[name];
    Document.prototype[name] = queries[name];
  });

  function childByName(parent, name) {
    if (!parent) return null;
    for (var i = 0; i < parent.childNodes.length; i++) {
      var child = parent.childNodes[i];
      if (isElement(child) && child.localName === name) return child;
    }
    return null;
  }

  Object.defineProperties(Document.prototype, {
    documentElement: { get: function () { return this.childNodes.filter(isElement)[0] || null; } },
    head: { get: function () { return childByName(this.documentElement, 'head'); } },
    body: { get: function () { return childByName(this.documentElement, 'body'); } },
    readyState: { get: function () { return host.readyState; } },
    URL: { get: function () { return global.location.href; } },
    documentURI: { get: function () { return global.location.href; } },
    location: { get: function () { return global.location; } },
    defaultView: { get: function () { return global; } },
    textContent: { get: function () { return null; }, set: function () {} },
    title: {
      get: function () {
        var element = this.getElementsByTagName('title')[0];
        return element ? element.textContent.replace(/\s+/g, ' ').trim() : '';
      },
      set: function (value) {
        var element = this.getElementsByTagName('title')[0];
        if (!element) {
          if (!this.head) return;
          element = this.head.appendChild(new Element('title'));
        }
        element.textContent = String(value);
      }
    }
  });
  Document.prototype.createElement = function (name) {
    return new Element(name);
  };
  Document.prototype.createTextNode = function (data) {
    return new Text(data);
  };
  Document.prototype.getElementById = function (id) {
    var key = String(id);
    return descendants(this, []).filter(function (element) {
      return element.getAttribute('id') === key;
    })[0] || null;
  };

  // Records arrive in document order with parent indices, root first.
  function build(document, records) {
    var nodes = [];
    for (var i = 0; i < records.length; i++) {
      var record = records[i];
      var node;
      if (record.kind === 'text') {
        node = new Text(record.text);
      } else {
        node = new Element(record.name);
        for (var j = 0; j < record.attrs.length; j++) {
          node.__attrs.push([record.attrs[j][0], record.attrs[j][1]]);
        }
      }
      var parent = record.parent === null ? document : nodes[record.parent];
      node.parentNode = parent;
      parent.childNodes.push(node);
      nodes.push(node);
    }
  }

  function opaqueNode(node) {
    if (isElement(node)) return node.outerHTML;
    if (node.nodeType === 3) return node.data;
    return node.nodeName;
  }

  // ---- location, navigator ----

  function Location(parts) {
    this.href = parts.href;
    this.origin = parts.origin;
    this.protocol = parts.protocol;
    this.host = parts.host;
    this.hostname = parts.hostname;
    this.port = parts.port;
    this.pathname = parts.pathname;
    this.search = parts.search;
    this.hash = parts.hash;
  }
  Location.prototype.toString = function () {
    return this.href;
  };
  Location.prototype.assign = function (url) {
    this.href = String(url);
  };
  Location.prototype.replace = Location.prototype.assign;
  Location.prototype.reload = function () {};

  // ---- timers on a virtual clock ----

  function schedule(callback, delay, args, repeat) {
    if (typeof callback !== 'function') {
      var source = String(callback);
      callback = function () { (0, eval)(source); };
    }
    var id = host.nextTimerId++;
    var wait = Math.max(0, Number(delay) || 0);
    host.timers.push({
      id: id,
      due: host.clock + wait,
      seq: host.seq++,
      callback: callback,
      args: args,
      interval: repeat ? Math.max(1, wait) : 0
    });
    return id;
  }

  function cancel(id) {
    var key = Number(id);
    var before = host.timers.length;
    host.timers = host.timers.filter(function (timer) { return timer.id !== key; });
    if (host.timers.length === before) host.cancelled[key] = true;
  }

  host.pendingTimers = function () {
    return host.timers.length;
  };

  host.flushTimers = function (limit) {
    var runs = 0;
    while (host.timers.length > 0 && runs < limit) {
      host.timers.sort(function (a, b) { return a.due - b.due || a.seq - b.seq; });
      var timer = host.timers.shift();
      host.clock = Math.max(host.clock, timer.due);
      runs++;
      try {
        timer.callback.apply(global, timer.args);
      } catch (error) {
        host.reportError(error, 'timer:' + timer.id);
      }
      if (timer.interval && !host.cancelled[timer.id]) {
        timer.due = host.clock + timer.interval;
        timer.seq = host.seq++;
        host.timers.push(timer);
      }
      delete host.cancelled[timer.id];
    }
    return runs;
  };

  // ---- console ----

  function consoleMethod(level) {
    return function () {
      var parts = [];
      for (var i = 0; i < arguments.length; i++) parts.push(describe(arguments[i]));
      host.console.push({ level: level, message: parts.join(' ') });
    };
  }

  // ---- host entry points ----

  host.boot = function (records, options) {
    var document = new Document();
    build(document, records);

    global.window = global;
    global.self = global;
    global.document = document;
    global.location = new Location(options.location);
    global.navigator = {
      userAgent: options.userAgent,
      language: 'en-US',
      languages: ['en-US'],
      platform: '',
      onLine: true,
      cookieEnabled: false
    };
    global.console = {
      log: consoleMethod('log'),
      info: consoleMethod('info'),
      warn: consoleMethod('warn'),
      error: consoleMethod('error'),
      debug: consoleMethod('debug'),
      trace: consoleMethod('debug')
    };

    ['addEventListener', 'removeEventListener', 'dispatchEvent'].forEach(function (name) {
      global[name] = EventTarget.prototype[name].bind(global);
    });

    global.setTimeout = function (callback, delay) {
      return schedule(callback, delay, Array.prototype.slice.call(arguments, 2), false);
    };
    global.setInterval = function (callback, delay) {
      return schedule(callback, delay, Array.prototype.slice.call(arguments, 2), true);
    };
    global.clearTimeout = cancel;
    global.clearInterval = cancel;
    global.requestAnimationFrame = function (callback) {
      return schedule(function () { callback(host.clock); }, 16, [], false);
    };
    global.cancelAnimationFrame = cancel;
    global.queueMicrotask = function (callback) {
      schedule(callback, 0, [], false);
    };

    global.EventTarget = EventTarget;
    global.Event = Event;
    global.MessageEvent = MessageEvent;
    global.CustomEvent = CustomEvent;
    global.Node = Node;
    global.Element = Element;
    global.HTMLElement = Element;
    global.Text = Text;
    global.Document = Document;
  };

  host.setReadyState = function (state) {
    host.readyState = state;
    global.document.dispatchEvent(new Event('readystatechange'));
  };
  host.fireContentLoaded = function () {
    global.document.dispatchEvent(new Event('DOMContentLoaded', { bubbles: true }));
  };
  host.fireLoad = function () {
    global.dispatchEvent(new Event('load'));
  };

  host.drain = function () {
    var out = JSON.stringify({ console: host.console, errors: host.errors });
    host.console = [];
    host.errors = [];
    return out;
  };

  host.capture = function (value) {
    if (value === undefined) return '{"t":"u"}';
    var kind = typeof value;
    if (kind === 'function' || kind === 'symbol' || kind === 'bigint') {
      return JSON.stringify({ t: 'o', v: String(value) });
    }
    if (value instanceof Node) return JSON.stringify({ t: 'o', v: opaqueNode(value) });
    try {
      var json = JSON.stringify(value);
      if (json !== undefined) return '{"t":"j","v":' + json + '}';
    } catch (error) {}
    return JSON.stringify({ t: 'o', v: String(value) });
  };
})(globalThis);
"##;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BootOptions<'a> {
    location: &'a LocationParts,
    user_agent: &'a str,
}

/// Script that rebuilds `nodes` as the live document and installs globals.
///
/// The records are a flat array so the generated literal stays shallow no
/// matter how deeply the markup nests.
pub(crate) fn boot_script(
    nodes: &[NodeRecord],
    location: &LocationParts,
    user_agent: &str,
) -> Result<String, DomError> {
    let tree = serde_json::to_string(nodes).map_err(|e| DomError::Bootstrap(e.to_string()))?;
    let options = serde_json::to_string(&BootOptions {
        location,
        user_agent,
    })
    .map_err(|e| DomError::Bootstrap(e.to_string()))?;
    Ok(format!("__mockview_dom.boot({tree}, {options});"))
}

/// Quote `input` as a script string literal.
pub(crate) fn js_string(input: &str) -> Result<String, DomError> {
    serde_json::to_string(input).map_err(|e| DomError::Decode(e.to_string()))
}
